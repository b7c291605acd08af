//! Cluster service layer

pub mod cluster_config;
pub mod ephemeral_container;

pub use cluster_config::ClusterConfigResolver;
pub use ephemeral_container::EphemeralContainerAuditor;

//! Helmsman Cluster - cluster access and ephemeral container auditing
//!
//! This crate provides:
//! - `ClusterConfigResolver`: projects a stored cluster into the `ClusterConfig`
//!   message handed to the Helm RPC layer
//! - `EphemeralContainerAuditor`: records create/access/terminate actions on
//!   ephemeral debug containers inside one transaction

pub mod model;
pub mod service;

pub use model::{
    ClusterConfig, EphemeralContainerAdvancedData, EphemeralContainerAuditRecord,
    EphemeralContainerBasicData, EphemeralContainerRequest,
};
pub use service::{ClusterConfigResolver, EphemeralContainerAuditor};

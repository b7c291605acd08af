//! `SeaORM` Entity prelude

pub use super::chart::Entity as Chart;
pub use super::chart_ref::Entity as ChartRef;
pub use super::cluster::Entity as Cluster;
pub use super::deployment_config::Entity as DeploymentConfig;
pub use super::ephemeral_container::Entity as EphemeralContainer;
pub use super::ephemeral_container_action::Entity as EphemeralContainerAction;

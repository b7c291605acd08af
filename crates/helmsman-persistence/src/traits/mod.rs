//! Persistence traits for the storage abstraction layer
//!
//! Services depend on these traits rather than on SeaORM directly, so the
//! SQL backend can be swapped for an in-memory one in tests.

pub mod chart;
pub mod cluster;
pub mod deployment_config;
pub mod ephemeral_container;

pub use chart::{ChartPersistence, ChartRefPersistence};
pub use cluster::ClusterPersistence;
pub use deployment_config::DeploymentConfigPersistence;
pub use ephemeral_container::EphemeralContainerPersistence;

use async_trait::async_trait;

/// Unified persistence service trait
///
/// Implemented by backends that cover every table of the service layer.
#[async_trait]
pub trait PersistenceService:
    ClusterPersistence
    + EphemeralContainerPersistence
    + ChartPersistence
    + ChartRefPersistence
    + DeploymentConfigPersistence
    + Send
    + Sync
{
    /// Health check for the storage backend
    async fn health_check(&self) -> anyhow::Result<()>;
}

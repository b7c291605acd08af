//! Cluster persistence trait

use async_trait::async_trait;

use crate::model::ClusterInfo;

/// Cluster read operations
#[async_trait]
pub trait ClusterPersistence: Send + Sync {
    /// Get a cluster by its ID
    async fn cluster_find_by_id(&self, id: i32) -> anyhow::Result<Option<ClusterInfo>>;
}

//! Ephemeral container persistence trait
//!
//! Writes go through an explicit transaction handle. `commit_tx` and
//! `rollback_tx` take the handle by value, so a transaction is finished
//! exactly once.

use async_trait::async_trait;

use crate::model::{EphemeralContainerActionInfo, EphemeralContainerInfo};

/// Ephemeral container storage operations
#[async_trait]
pub trait EphemeralContainerPersistence: Send + Sync {
    /// Transaction handle of the backend
    type Tx: Send + Sync;

    /// Find a container by its identifying tuple
    async fn container_find_by_name(
        &self,
        cluster_id: i32,
        namespace: &str,
        pod_name: &str,
        container_name: &str,
    ) -> anyhow::Result<Option<EphemeralContainerInfo>>;

    /// List the audit trail of a container, oldest first
    async fn container_actions_find(
        &self,
        ephemeral_container_id: i32,
    ) -> anyhow::Result<Vec<EphemeralContainerActionInfo>>;

    /// Open a transaction
    async fn start_tx(&self) -> anyhow::Result<Self::Tx>;

    /// Commit a transaction
    async fn commit_tx(&self, tx: Self::Tx) -> anyhow::Result<()>;

    /// Roll back a transaction
    async fn rollback_tx(&self, tx: Self::Tx) -> anyhow::Result<()>;

    /// Insert a container row and fill in its generated id
    async fn container_save(
        &self,
        tx: &Self::Tx,
        container: &mut EphemeralContainerInfo,
    ) -> anyhow::Result<()>;

    /// Append an audit row and fill in its generated id
    async fn container_action_save(
        &self,
        tx: &Self::Tx,
        action: &mut EphemeralContainerActionInfo,
    ) -> anyhow::Result<()>;
}

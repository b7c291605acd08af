//! Chart and chart reference persistence traits

use async_trait::async_trait;

use crate::model::{ChartInfo, ChartRefInfo, DeploymentConfig};

/// Chart storage operations
#[async_trait]
pub trait ChartPersistence: Send + Sync {
    /// Get a chart by its ID
    async fn chart_find_by_id(&self, id: i32) -> anyhow::Result<Option<ChartInfo>>;

    /// Update a chart and save `config` as `user_id` in one transaction.
    ///
    /// Returns the stored config, or `None` with nothing written when the
    /// chart row does not exist.
    async fn chart_update_with_config(
        &self,
        chart: &ChartInfo,
        config: &DeploymentConfig,
        user_id: i32,
    ) -> anyhow::Result<Option<DeploymentConfig>>;
}

/// Chart reference read operations
#[async_trait]
pub trait ChartRefPersistence: Send + Sync {
    /// Get a chart reference by its ID
    async fn chart_ref_find_by_id(&self, id: i32) -> anyhow::Result<Option<ChartRefInfo>>;
}

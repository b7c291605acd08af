//! Deployment config persistence trait

use async_trait::async_trait;

use crate::model::DeploymentConfig;

/// Deployment config storage operations
#[async_trait]
pub trait DeploymentConfigPersistence: Send + Sync {
    /// Get a deployment config by its ID
    async fn deployment_config_find_by_id(
        &self,
        id: i32,
    ) -> anyhow::Result<Option<DeploymentConfig>>;

    /// Get the active deployment config of an app in an environment
    async fn deployment_config_find(
        &self,
        app_id: i32,
        environment_id: i32,
    ) -> anyhow::Result<Option<DeploymentConfig>>;

    /// Insert (id == 0) or update a deployment config, returns the stored row
    async fn deployment_config_save(
        &self,
        config: &DeploymentConfig,
        user_id: i32,
    ) -> anyhow::Result<DeploymentConfig>;
}

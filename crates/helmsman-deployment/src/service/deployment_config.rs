//! Deployment config service

use std::sync::Arc;

use tracing::{error, info};

use helmsman_persistence::DeploymentConfigPersistence;
use helmsman_persistence::model::DeploymentConfig;

pub struct DeploymentConfigService<P> {
    persistence: Arc<P>,
}

impl<P> Clone for DeploymentConfigService<P> {
    fn clone(&self) -> Self {
        Self {
            persistence: self.persistence.clone(),
        }
    }
}

impl<P: DeploymentConfigPersistence> DeploymentConfigService<P> {
    pub fn new(persistence: Arc<P>) -> Self {
        Self { persistence }
    }

    /// Active deployment config of an app in an environment
    pub async fn get_config(
        &self,
        app_id: i32,
        environment_id: i32,
    ) -> anyhow::Result<Option<DeploymentConfig>> {
        self.persistence
            .deployment_config_find(app_id, environment_id)
            .await
            .inspect_err(|e| {
                error!(
                    error = %e,
                    app_id,
                    environment_id,
                    "error in fetching deployment config"
                )
            })
    }

    pub async fn get_config_by_id(&self, id: i32) -> anyhow::Result<Option<DeploymentConfig>> {
        self.persistence
            .deployment_config_find_by_id(id)
            .await
            .inspect_err(|e| error!(error = %e, id, "error in fetching deployment config"))
    }

    /// Insert the config when it has no id yet, update it otherwise.
    pub async fn create_or_update_config(
        &self,
        config: &DeploymentConfig,
        user_id: i32,
    ) -> anyhow::Result<DeploymentConfig> {
        let saved = self
            .persistence
            .deployment_config_save(config, user_id)
            .await
            .inspect_err(|e| {
                error!(
                    error = %e,
                    app_id = config.app_id,
                    environment_id = config.environment_id,
                    "error occurred while creating or updating config"
                )
            })?;

        info!(
            id = saved.id,
            app_id = saved.app_id,
            environment_id = saved.environment_id,
            created = config.id == 0,
            "deployment config saved"
        );
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct InMemoryConfigs {
        rows: Mutex<Vec<(DeploymentConfig, i32)>>,
    }

    #[async_trait]
    impl DeploymentConfigPersistence for InMemoryConfigs {
        async fn deployment_config_find_by_id(
            &self,
            id: i32,
        ) -> anyhow::Result<Option<DeploymentConfig>> {
            let rows = self.rows.lock().unwrap();
            Ok(rows.iter().map(|(c, _)| c).find(|c| c.id == id).cloned())
        }

        async fn deployment_config_find(
            &self,
            app_id: i32,
            environment_id: i32,
        ) -> anyhow::Result<Option<DeploymentConfig>> {
            let rows = self.rows.lock().unwrap();
            Ok(rows
                .iter()
                .map(|(c, _)| c)
                .find(|c| c.app_id == app_id && c.environment_id == environment_id && c.active)
                .cloned())
        }

        async fn deployment_config_save(
            &self,
            config: &DeploymentConfig,
            user_id: i32,
        ) -> anyhow::Result<DeploymentConfig> {
            let mut rows = self.rows.lock().unwrap();
            let mut saved = config.clone();
            if saved.id == 0 {
                saved.id = rows.len() as i32 + 1;
                rows.push((saved.clone(), user_id));
                return Ok(saved);
            }
            match rows.iter_mut().find(|(c, _)| c.id == saved.id) {
                Some(row) => *row = (saved.clone(), user_id),
                None => anyhow::bail!("deployment config '{}' not exist", saved.id),
            }
            Ok(saved)
        }
    }

    #[tokio::test]
    async fn test_create_then_update_config() {
        let store = Arc::new(InMemoryConfigs::default());
        let service = DeploymentConfigService::new(store.clone());

        let created = service
            .create_or_update_config(
                &DeploymentConfig {
                    app_id: 10,
                    environment_id: 4,
                    chart_location: "reference-chart_1-0-0/0.9.0".to_string(),
                    active: true,
                    ..Default::default()
                },
                3,
            )
            .await
            .unwrap();
        assert_eq!(created.id, 1);

        let mut changed = created.clone();
        changed.set_chart_location("reference-chart_1-0-0/1.0.0");
        let updated = service.create_or_update_config(&changed, 5).await.unwrap();
        assert_eq!(updated.id, created.id);

        let found = service.get_config(10, 4).await.unwrap().unwrap();
        assert_eq!(found.chart_location, "reference-chart_1-0-0/1.0.0");
        assert_eq!(store.rows.lock().unwrap()[0].1, 5);
        assert_eq!(
            service.get_config_by_id(created.id).await.unwrap(),
            Some(found)
        );
        assert!(service.get_config(10, 99).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_of_unknown_config_fails() {
        let service = DeploymentConfigService::new(Arc::new(InMemoryConfigs::default()));

        let result = service
            .create_or_update_config(
                &DeploymentConfig {
                    id: 42,
                    ..Default::default()
                },
                1,
            )
            .await;
        assert!(result.is_err());
    }
}

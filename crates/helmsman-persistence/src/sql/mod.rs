//! SQL-based persistence backend (MySQL/PostgreSQL via SeaORM)
//!
//! This module implements the persistence traits on top of a SeaORM
//! `DatabaseConnection`. Entity models are converted to the storage-agnostic
//! types of `crate::model` at this boundary.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{prelude::Expr, *};

use helmsman_common::HelmsmanError;

use crate::entity::{
    chart, chart_ref, cluster, deployment_config, ephemeral_container,
    ephemeral_container_action,
};
use crate::model::*;
use crate::traits::*;

/// External database persistence service
///
/// Wraps a SeaORM `DatabaseConnection` and implements all persistence traits
/// by issuing queries directly.
#[derive(Clone)]
pub struct ExternalDbPersistService {
    db: DatabaseConnection,
}

impl ExternalDbPersistService {
    /// Create a new ExternalDbPersistService with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Get a reference to the underlying database connection
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

// ============================================================================
// Entity conversions
// ============================================================================

fn cluster_entity_to_info(model: cluster::Model) -> anyhow::Result<ClusterInfo> {
    let config: HashMap<String, String> = if model.config.trim().is_empty() {
        HashMap::new()
    } else {
        serde_json::from_str(&model.config)?
    };

    Ok(ClusterInfo {
        id: model.id,
        cluster_name: model.cluster_name,
        server_url: model.server_url,
        config,
        insecure_skip_tls_verify: model.insecure_skip_tls_verify,
        active: model.active,
    })
}

fn container_entity_to_info(model: ephemeral_container::Model) -> EphemeralContainerInfo {
    EphemeralContainerInfo {
        id: model.id,
        name: model.name,
        cluster_id: model.cluster_id,
        namespace: model.namespace,
        pod_name: model.pod_name,
        target_container: model.target_container,
        config: model.config,
        is_externally_created: model.is_externally_created,
    }
}

fn action_entity_to_info(
    model: ephemeral_container_action::Model,
) -> anyhow::Result<EphemeralContainerActionInfo> {
    Ok(EphemeralContainerActionInfo {
        id: model.id,
        ephemeral_container_id: model.ephemeral_container_id,
        action_type: ContainerAction::try_from(model.action_type)?,
        performed_by: model.performed_by,
        performed_at: DateTime::<Utc>::from_naive_utc_and_offset(model.performed_at, Utc),
    })
}

fn chart_entity_to_info(model: chart::Model) -> ChartInfo {
    ChartInfo {
        id: model.id,
        app_id: model.app_id,
        chart_ref_id: model.chart_ref_id,
        chart_name: model.chart_name,
        chart_version: model.chart_version,
        chart_location: model.chart_location,
        reference_template: model.reference_template,
        latest: model.latest,
        active: model.active,
        updated_by: model.updated_by,
    }
}

fn chart_ref_entity_to_info(model: chart_ref::Model) -> ChartRefInfo {
    ChartRefInfo {
        id: model.id,
        location: model.location,
        version: model.version,
        name: model.name,
        chart_data: model.chart_data,
        user_uploaded: model.user_uploaded,
        active: model.active,
    }
}

fn deployment_config_entity_to_info(
    model: deployment_config::Model,
) -> anyhow::Result<DeploymentConfig> {
    let release_mode = model
        .release_mode
        .parse::<ReleaseMode>()
        .map_err(|e| anyhow::anyhow!(e))?;

    Ok(DeploymentConfig {
        id: model.id,
        app_id: model.app_id,
        environment_id: model.environment_id,
        chart_location: model.chart_location,
        release_mode,
        active: model.active,
    })
}

// ============================================================================
// PersistenceService implementation
// ============================================================================

#[async_trait]
impl PersistenceService for ExternalDbPersistService {
    async fn health_check(&self) -> anyhow::Result<()> {
        cluster::Entity::find()
            .select_only()
            .column_as(Expr::cust("1"), "health")
            .into_tuple::<i32>()
            .one(&self.db)
            .await?;
        Ok(())
    }
}

// ============================================================================
// ClusterPersistence implementation
// ============================================================================

#[async_trait]
impl ClusterPersistence for ExternalDbPersistService {
    async fn cluster_find_by_id(&self, id: i32) -> anyhow::Result<Option<ClusterInfo>> {
        cluster::Entity::find_by_id(id)
            .filter(cluster::Column::Active.eq(true))
            .one(&self.db)
            .await?
            .map(cluster_entity_to_info)
            .transpose()
    }
}

// ============================================================================
// EphemeralContainerPersistence implementation
// ============================================================================

#[async_trait]
impl EphemeralContainerPersistence for ExternalDbPersistService {
    type Tx = DatabaseTransaction;

    async fn container_find_by_name(
        &self,
        cluster_id: i32,
        namespace: &str,
        pod_name: &str,
        container_name: &str,
    ) -> anyhow::Result<Option<EphemeralContainerInfo>> {
        let container = ephemeral_container::Entity::find()
            .filter(ephemeral_container::Column::ClusterId.eq(cluster_id))
            .filter(ephemeral_container::Column::Namespace.eq(namespace))
            .filter(ephemeral_container::Column::PodName.eq(pod_name))
            .filter(ephemeral_container::Column::Name.eq(container_name))
            .one(&self.db)
            .await?
            .map(container_entity_to_info);

        Ok(container)
    }

    async fn container_actions_find(
        &self,
        ephemeral_container_id: i32,
    ) -> anyhow::Result<Vec<EphemeralContainerActionInfo>> {
        ephemeral_container_action::Entity::find()
            .filter(
                ephemeral_container_action::Column::EphemeralContainerId
                    .eq(ephemeral_container_id),
            )
            .order_by_asc(ephemeral_container_action::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(action_entity_to_info)
            .collect()
    }

    async fn start_tx(&self) -> anyhow::Result<DatabaseTransaction> {
        Ok(self.db.begin().await?)
    }

    async fn commit_tx(&self, tx: DatabaseTransaction) -> anyhow::Result<()> {
        tx.commit().await?;
        Ok(())
    }

    async fn rollback_tx(&self, tx: DatabaseTransaction) -> anyhow::Result<()> {
        tx.rollback().await?;
        Ok(())
    }

    async fn container_save(
        &self,
        tx: &DatabaseTransaction,
        container: &mut EphemeralContainerInfo,
    ) -> anyhow::Result<()> {
        let entity = ephemeral_container::ActiveModel {
            name: Set(container.name.clone()),
            cluster_id: Set(container.cluster_id),
            namespace: Set(container.namespace.clone()),
            pod_name: Set(container.pod_name.clone()),
            target_container: Set(container.target_container.clone()),
            config: Set(container.config.clone()),
            is_externally_created: Set(container.is_externally_created),
            ..Default::default()
        };

        let result = ephemeral_container::Entity::insert(entity).exec(tx).await?;
        container.id = result.last_insert_id;

        Ok(())
    }

    async fn container_action_save(
        &self,
        tx: &DatabaseTransaction,
        action: &mut EphemeralContainerActionInfo,
    ) -> anyhow::Result<()> {
        let entity = ephemeral_container_action::ActiveModel {
            ephemeral_container_id: Set(action.ephemeral_container_id),
            action_type: Set(action.action_type.code()),
            performed_by: Set(action.performed_by),
            performed_at: Set(action.performed_at.naive_utc()),
            ..Default::default()
        };

        let result = ephemeral_container_action::Entity::insert(entity)
            .exec(tx)
            .await?;
        action.id = result.last_insert_id;

        Ok(())
    }
}

// ============================================================================
// ChartPersistence / ChartRefPersistence implementation
// ============================================================================

#[async_trait]
impl ChartPersistence for ExternalDbPersistService {
    async fn chart_find_by_id(&self, id: i32) -> anyhow::Result<Option<ChartInfo>> {
        let chart = chart::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(chart_entity_to_info);

        Ok(chart)
    }

    async fn chart_update_with_config(
        &self,
        chart: &ChartInfo,
        config: &DeploymentConfig,
        user_id: i32,
    ) -> anyhow::Result<Option<DeploymentConfig>> {
        // Dropping the transaction on an early return rolls it back
        let txn = self.db.begin().await?;

        if !update_chart(&txn, chart).await? {
            txn.rollback().await?;
            return Ok(None);
        }
        let saved = save_deployment_config(&txn, config, user_id).await?;

        txn.commit().await?;
        Ok(Some(saved))
    }
}

#[async_trait]
impl ChartRefPersistence for ExternalDbPersistService {
    async fn chart_ref_find_by_id(&self, id: i32) -> anyhow::Result<Option<ChartRefInfo>> {
        let chart_ref = chart_ref::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(chart_ref_entity_to_info);

        Ok(chart_ref)
    }
}

// ============================================================================
// DeploymentConfigPersistence implementation
// ============================================================================

#[async_trait]
impl DeploymentConfigPersistence for ExternalDbPersistService {
    async fn deployment_config_find_by_id(
        &self,
        id: i32,
    ) -> anyhow::Result<Option<DeploymentConfig>> {
        deployment_config::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(deployment_config_entity_to_info)
            .transpose()
    }

    async fn deployment_config_find(
        &self,
        app_id: i32,
        environment_id: i32,
    ) -> anyhow::Result<Option<DeploymentConfig>> {
        deployment_config::Entity::find()
            .filter(deployment_config::Column::AppId.eq(app_id))
            .filter(deployment_config::Column::EnvironmentId.eq(environment_id))
            .filter(deployment_config::Column::Active.eq(true))
            .one(&self.db)
            .await?
            .map(deployment_config_entity_to_info)
            .transpose()
    }

    async fn deployment_config_save(
        &self,
        config: &DeploymentConfig,
        user_id: i32,
    ) -> anyhow::Result<DeploymentConfig> {
        save_deployment_config(&self.db, config, user_id).await
    }
}

// ============================================================================
// Shared writes, usable on a connection or inside a transaction
// ============================================================================

async fn update_chart<C: ConnectionTrait>(conn: &C, chart: &ChartInfo) -> anyhow::Result<bool> {
    let Some(entity) = chart::Entity::find_by_id(chart.id).one(conn).await? else {
        return Ok(false);
    };

    let mut active: chart::ActiveModel = entity.into();
    active.app_id = Set(chart.app_id);
    active.chart_ref_id = Set(chart.chart_ref_id);
    active.chart_name = Set(chart.chart_name.clone());
    active.chart_version = Set(chart.chart_version.clone());
    active.chart_location = Set(chart.chart_location.clone());
    active.reference_template = Set(chart.reference_template.clone());
    active.latest = Set(chart.latest);
    active.active = Set(chart.active);
    active.updated_by = Set(chart.updated_by);

    if active.is_changed() {
        active.updated_on = Set(Utc::now().naive_utc());
        active.update(conn).await?;
    }

    Ok(true)
}

async fn save_deployment_config<C: ConnectionTrait>(
    conn: &C,
    config: &DeploymentConfig,
    user_id: i32,
) -> anyhow::Result<DeploymentConfig> {
    let now = Utc::now().naive_utc();

    let saved = if config.id == 0 {
        let entity = deployment_config::ActiveModel {
            app_id: Set(config.app_id),
            environment_id: Set(config.environment_id),
            chart_location: Set(config.chart_location.clone()),
            release_mode: Set(config.release_mode.as_str().to_string()),
            active: Set(config.active),
            updated_by: Set(user_id),
            updated_on: Set(now),
            ..Default::default()
        };
        entity.insert(conn).await?
    } else {
        let entity = deployment_config::Entity::find_by_id(config.id)
            .one(conn)
            .await?
            .ok_or_else(|| {
                HelmsmanError::ConfigError(format!("deployment config '{}' not exist", config.id))
            })?;

        let mut active: deployment_config::ActiveModel = entity.into();
        active.app_id = Set(config.app_id);
        active.environment_id = Set(config.environment_id);
        active.chart_location = Set(config.chart_location.clone());
        active.release_mode = Set(config.release_mode.as_str().to_string());
        active.active = Set(config.active);
        active.updated_by = Set(user_id);
        active.updated_on = Set(now);
        active.update(conn).await?
    };

    deployment_config_entity_to_info(saved)
}

//! Subcommand handlers
//!
//! Every handler returns the JSON document printed by the binary.

use std::path::Path;
use std::sync::Arc;

use serde_json::{Value, json};
use tracing::info;

use helmsman_cluster::{
    ClusterConfigResolver, EphemeralContainerAdvancedData, EphemeralContainerAuditor,
    EphemeralContainerBasicData, EphemeralContainerRequest,
};
use helmsman_common::HelmsmanError;
use helmsman_deployment::{
    ChartOverride, ChartTemplateService, DeploymentConfigService, DeploymentTemplateService,
};
use helmsman_persistence::{ChartPersistence, ExternalDbPersistService, PersistenceService};

use crate::model::{Command, Configuration};
use crate::startup;

pub async fn run(configuration: &Configuration, command: Command) -> anyhow::Result<Value> {
    let db = startup::connect(&configuration.database_settings()?).await?;
    let persistence = Arc::new(ExternalDbPersistService::new(db));

    // The schema may not exist yet when migrating
    if !matches!(command, Command::Migrate) {
        persistence.health_check().await?;
    }

    match command {
        Command::Migrate => {
            let applied = startup::migrate(persistence.db()).await?;
            Ok(json!({ "applied": applied }))
        }
        Command::ClusterConfig {
            cluster_id,
            show_secrets,
        } => {
            let resolver = ClusterConfigResolver::new(persistence);
            let config = resolver.get_cluster_config(cluster_id).await?;
            let config = if show_secrets {
                config
            } else {
                config.redacted()
            };
            Ok(serde_json::to_value(config)?)
        }
        Command::AuditContainer {
            cluster_id,
            namespace,
            pod_name,
            container_name,
            target_container,
            image,
            manifest_file,
            action,
            user_id,
        } => {
            let advanced_data = manifest_file
                .as_deref()
                .map(read_manifest)
                .transpose()?;
            let request = EphemeralContainerRequest {
                basic_data: EphemeralContainerBasicData {
                    container_name,
                    target_container_name: target_container,
                    image,
                },
                advanced_data,
                namespace,
                cluster_id,
                pod_name,
                user_id,
            };

            let auditor = EphemeralContainerAuditor::new(persistence);
            let record = auditor
                .audit_ephemeral_container_action(&request, action)
                .await?;
            Ok(serde_json::to_value(record)?)
        }
        Command::AuditTrail {
            cluster_id,
            namespace,
            pod_name,
            container_name,
        } => {
            let auditor = EphemeralContainerAuditor::new(persistence);
            let trail = auditor
                .container_audit_trail(cluster_id, &namespace, &pod_name, &container_name)
                .await?;
            Ok(serde_json::to_value(trail)?)
        }
        Command::BuildChart {
            app_name,
            chart_id,
            deployment_config_id,
        } => {
            build_chart(
                configuration,
                persistence,
                &app_name,
                chart_id,
                deployment_config_id,
            )
            .await
        }
    }
}

fn read_manifest(path: &Path) -> anyhow::Result<EphemeralContainerAdvancedData> {
    Ok(EphemeralContainerAdvancedData {
        manifest: std::fs::read_to_string(path)?,
    })
}

async fn build_chart(
    configuration: &Configuration,
    persistence: Arc<ExternalDbPersistService>,
    app_name: &str,
    chart_id: i32,
    deployment_config_id: i32,
) -> anyhow::Result<Value> {
    let chart = persistence
        .chart_find_by_id(chart_id)
        .await?
        .ok_or(HelmsmanError::ChartNotExist(chart_id))?;
    let mut chart_override = ChartOverride::from(chart);

    let mut deployment_config = DeploymentConfigService::new(persistence.clone())
        .get_config_by_id(deployment_config_id)
        .await?
        .ok_or_else(|| {
            anyhow::anyhow!("deployment config '{}' not exist", deployment_config_id)
        })?;

    let original_location = chart_override.chart_location.clone();
    let service = DeploymentTemplateService::new(
        persistence,
        ChartTemplateService::new(configuration.chart_working_dir()),
        configuration.ref_chart_dir(),
    );
    let path = service
        .build_chart_and_get_path(app_name, &mut chart_override, &mut deployment_config)
        .await?;

    let healed = chart_override.chart_location != original_location;
    info!(app_name, path = %path.display(), healed, "chart ready");
    Ok(json!({
        "path": path.display().to_string(),
        "chartLocation": chart_override.chart_location,
        "healed": healed,
        "deploymentConfig": deployment_config,
    }))
}

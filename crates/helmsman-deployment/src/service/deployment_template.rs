//! Chart path building for deployments
//!
//! Before a chart is built, the stored chart location must end with the chart
//! version. Drifted locations are healed from the chart reference; the chart
//! row and the deployment config are written in one transaction.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{Instrument, error, info, info_span};

use helmsman_common::{HelmsmanError, SYSTEM_USER_ID};
use helmsman_persistence::model::DeploymentConfig;
use helmsman_persistence::{ChartPersistence, ChartRefPersistence};

use crate::model::{ChartMetadata, ChartOverride};
use crate::service::chart_ref::{chart_path, remove_temporary_folder};
use crate::service::{ChartRefService, ChartTemplateService};

pub struct DeploymentTemplateService<P> {
    chart_persistence: Arc<P>,
    chart_ref_service: ChartRefService<P>,
    chart_template_service: ChartTemplateService,
    ref_chart_dir: PathBuf,
}

impl<P> DeploymentTemplateService<P>
where
    P: ChartPersistence + ChartRefPersistence,
{
    pub fn new(
        persistence: Arc<P>,
        chart_template_service: ChartTemplateService,
        ref_chart_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            chart_ref_service: ChartRefService::new(persistence.clone()),
            chart_persistence: persistence,
            chart_template_service,
            ref_chart_dir: ref_chart_dir.into(),
        }
    }

    pub fn ref_chart_dir(&self) -> &Path {
        &self.ref_chart_dir
    }

    /// Build the chart of `app_name` and return its directory.
    ///
    /// Unless the release is linked, `chart_override` and `deployment_config`
    /// are healed in place when their location does not end with the chart
    /// version. A failed heal leaves both untouched. A missing reference template is extracted from the chart-ref
    /// archive first.
    pub async fn build_chart_and_get_path(
        &self,
        app_name: &str,
        chart_override: &mut ChartOverride,
        deployment_config: &mut DeploymentConfig,
    ) -> anyhow::Result<PathBuf> {
        if !deployment_config.is_linked_release()
            && (!chart_override.location_matches_version(&chart_override.chart_location)
                || !chart_override.location_matches_version(deployment_config.chart_location()))
        {
            let span = info_span!("auto_heal_chart_location", chart_id = chart_override.chart_id);
            self.auto_heal_chart_location(chart_override, deployment_config)
                .instrument(span)
                .await?;
        }

        let metadata = ChartMetadata::new(app_name, chart_override.chart_version.clone());
        let reference_template_path =
            chart_path(&self.ref_chart_dir, &chart_override.reference_template)?;
        if !reference_template_path.exists() {
            let span = info_span!(
                "load_reference_template",
                chart_ref_id = chart_override.chart_ref_id
            );
            self.load_reference_template(chart_override.chart_ref_id)
                .instrument(span)
                .await?;
        }

        info_span!("build_chart", app_name, chart_version = %metadata.version).in_scope(|| {
            self.chart_template_service
                .build_chart(&metadata, &reference_template_path)
        })
    }

    async fn auto_heal_chart_location(
        &self,
        chart_override: &mut ChartOverride,
        deployment_config: &mut DeploymentConfig,
    ) -> anyhow::Result<()> {
        let chart_id = chart_override.chart_id;
        info!(
            chart_id,
            current_chart_location = %chart_override.chart_location,
            current_chart_version = %chart_override.chart_version,
            "auto-healing: chart location in chart not correct, modifying"
        );

        // The override is a projection, the update needs the full row
        let mut chart = self
            .chart_persistence
            .chart_find_by_id(chart_id)
            .instrument(info_span!("chart_find_by_id", chart_id))
            .await
            .inspect_err(|e| {
                error!(error = %e, chart_id, "error occurred while fetching chart from DB")
            })?
            .ok_or(HelmsmanError::ChartNotExist(chart_id))?;

        let chart_ref_id = chart.chart_ref_id;
        let chart_ref = self
            .chart_ref_service
            .find_by_id(chart_ref_id)
            .instrument(info_span!("chart_ref_find_by_id", chart_ref_id))
            .await?;

        let new_chart_location = format!(
            "{}/{}",
            chart_ref.location.trim_end_matches('/'),
            chart_override.chart_version
        );
        info!(chart_id, new_chart_location = %new_chart_location, "new chart location built");

        chart.chart_location = new_chart_location.clone();
        let mut healed_config = deployment_config.clone();
        healed_config.set_chart_location(new_chart_location.clone());

        let saved_config = self
            .chart_persistence
            .chart_update_with_config(&chart, &healed_config, SYSTEM_USER_ID)
            .instrument(info_span!("chart_update_with_config", chart_id))
            .await
            .inspect_err(|e| {
                error!(
                    error = %e,
                    chart_id,
                    deployment_config_id = deployment_config.id,
                    "error occurred while saving chart and deployment config into DB"
                )
            })?
            .ok_or(HelmsmanError::ChartNotExist(chart_id))?;

        info!(
            chart_id,
            deployment_config_id = saved_config.id,
            "chart location healed"
        );
        chart_override.chart_location = new_chart_location;
        *deployment_config = saved_config;

        Ok(())
    }

    /// Extract the chart-ref archive into the reference chart directory.
    ///
    /// The scratch folder of the extraction is removed whether or not it
    /// succeeded. A chart ref without archive data is left alone.
    async fn load_reference_template(&self, chart_ref_id: i32) -> anyhow::Result<()> {
        let chart_ref = self.chart_ref_service.find_by_id(chart_ref_id).await?;
        let Some(chart_data) = chart_ref.chart_data.as_deref() else {
            return Ok(());
        };

        let result = self.chart_ref_service.extract_chart_if_missing(
            chart_data,
            &self.ref_chart_dir,
            &chart_ref.location,
        );

        let temporary_folder = match &result {
            Ok(info) => Some(info.temporary_folder.as_path()),
            Err(e) => match HelmsmanError::from_anyhow(e) {
                Some(HelmsmanError::ChartExtraction {
                    temporary_folder, ..
                }) => temporary_folder.as_deref(),
                _ => None,
            },
        };
        if let Some(folder) = temporary_folder {
            remove_temporary_folder(folder);
        }

        result
            .inspect_err(|e| {
                error!(error = %e, chart_ref_id, "error in extracting chart ref data")
            })
            .map(|_| ())
    }
}

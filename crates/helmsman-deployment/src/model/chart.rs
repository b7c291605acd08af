//! Chart override and chart build types

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use helmsman_persistence::model::ChartInfo;

/// `apiVersion` written into generated `Chart.yaml` files
pub const CHART_API_VERSION: &str = "v1";

/// Per-environment view of an app chart.
///
/// `chart_location` is rewritten in place when auto-heal corrects it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOverride {
    pub chart_id: i32,
    pub chart_location: String,
    pub chart_version: String,
    pub chart_ref_id: i32,
    pub reference_template: String,
}

impl ChartOverride {
    /// True when `location` ends with `/<chart_version>`.
    pub fn location_matches_version(&self, location: &str) -> bool {
        location.ends_with(&format!("/{}", self.chart_version))
    }
}

impl From<ChartInfo> for ChartOverride {
    fn from(chart: ChartInfo) -> Self {
        Self {
            chart_id: chart.id,
            chart_location: chart.chart_location,
            chart_version: chart.chart_version,
            chart_ref_id: chart.chart_ref_id,
            reference_template: chart.reference_template,
        }
    }
}

/// Metadata written into the `Chart.yaml` of a built chart
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMetadata {
    pub api_version: String,
    pub name: String,
    pub version: String,
}

impl ChartMetadata {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            api_version: CHART_API_VERSION.to_string(),
            name: name.into(),
            version: version.into(),
        }
    }
}

/// Result of unpacking a chart-ref archive
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChartDataInfo {
    /// Location of the chart relative to the reference chart directory
    pub chart_location: String,
    /// Scratch directory the archive was unpacked into; removed by the caller
    pub temporary_folder: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart_override(location: &str, version: &str) -> ChartOverride {
        ChartOverride {
            chart_location: location.to_string(),
            chart_version: version.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_location_matches_version() {
        let chart = chart_override("charts/foo/1.0.0", "1.0.0");
        assert!(chart.location_matches_version(&chart.chart_location));

        let drifted = chart_override("charts/foo/old", "1.0.0");
        assert!(!drifted.location_matches_version(&drifted.chart_location));
    }

    #[test]
    fn test_location_match_requires_path_separator() {
        let chart = chart_override("charts/foo-1.0.0", "1.0.0");
        assert!(!chart.location_matches_version(&chart.chart_location));
        assert!(!chart.location_matches_version("1.0.0"));
    }

    #[test]
    fn test_from_chart_info() {
        let chart = ChartOverride::from(ChartInfo {
            id: 5,
            chart_ref_id: 2,
            chart_version: "4.18.0".to_string(),
            chart_location: "reference-chart_4-18-0/4.18.0".to_string(),
            reference_template: "reference-chart_4-18-0".to_string(),
            ..Default::default()
        });
        assert_eq!(chart.chart_id, 5);
        assert_eq!(chart.chart_ref_id, 2);
        assert_eq!(chart.reference_template, "reference-chart_4-18-0");
    }

    #[test]
    fn test_metadata_api_version() {
        let metadata = ChartMetadata::new("web", "1.2.3");
        assert_eq!(metadata.api_version, "v1");
        assert_eq!(metadata.name, "web");
    }
}

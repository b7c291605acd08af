//! Chart reference lookups and archive extraction

use std::fs;
use std::io::Cursor;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use tracing::{error, info};
use uuid::Uuid;
use zip::ZipArchive;

use helmsman_common::HelmsmanError;
use helmsman_persistence::ChartRefPersistence;
use helmsman_persistence::model::ChartRefInfo;

use crate::model::ChartDataInfo;

// Archive entries that never belong to a chart
const IGNORED_ENTRIES: [&str; 1] = ["__MACOSX"];

pub struct ChartRefService<P> {
    persistence: Arc<P>,
}

impl<P> Clone for ChartRefService<P> {
    fn clone(&self) -> Self {
        Self {
            persistence: self.persistence.clone(),
        }
    }
}

impl<P: ChartRefPersistence> ChartRefService<P> {
    pub fn new(persistence: Arc<P>) -> Self {
        Self { persistence }
    }

    pub async fn find_by_id(&self, id: i32) -> anyhow::Result<ChartRefInfo> {
        self.persistence
            .chart_ref_find_by_id(id)
            .await
            .inspect_err(|e| error!(error = %e, chart_ref_id = id, "error in fetching chart ref"))?
            .ok_or_else(|| HelmsmanError::ChartRefNotExist(id).into())
    }

    /// Unpack a chart-ref archive to `<ref_chart_dir>/<location>`.
    ///
    /// The archive goes to a fresh scratch folder under `ref_chart_dir` first.
    /// When it holds a single top-level directory, that directory is the chart.
    /// An existing `<ref_chart_dir>/<location>` is left untouched. Errors are
    /// `HelmsmanError::ChartExtraction` carrying the scratch folder.
    pub fn extract_chart_if_missing(
        &self,
        chart_data: &[u8],
        ref_chart_dir: &Path,
        location: &str,
    ) -> anyhow::Result<ChartDataInfo> {
        let chart_location = chart_path(ref_chart_dir, location)?;
        let temporary_folder = ref_chart_dir.join(format!("tmp-{}", Uuid::new_v4()));
        let failed = |reason: String| HelmsmanError::ChartExtraction {
            location: location.to_string(),
            reason,
            temporary_folder: Some(temporary_folder.clone()),
        };

        fs::create_dir_all(&temporary_folder).map_err(|e| failed(e.to_string()))?;
        let mut archive =
            ZipArchive::new(Cursor::new(chart_data)).map_err(|e| failed(e.to_string()))?;
        archive
            .extract(&temporary_folder)
            .map_err(|e| failed(e.to_string()))?;

        let chart_root = chart_root(&temporary_folder).map_err(|e| failed(e.to_string()))?;
        if chart_location.exists() {
            info!(
                location,
                "chart location already present, skipping extracted copy"
            );
        } else {
            if let Some(parent) = chart_location.parent() {
                fs::create_dir_all(parent).map_err(|e| failed(e.to_string()))?;
            }
            fs::rename(&chart_root, &chart_location).map_err(|e| failed(e.to_string()))?;
            info!(location, path = %chart_location.display(), "chart extracted");
        }

        Ok(ChartDataInfo {
            chart_location: location.to_string(),
            temporary_folder,
        })
    }
}

/// Join a stored chart location onto `ref_chart_dir`.
///
/// Locations come from the database; anything that is not a plain relative
/// path (absolute, `..`, empty) is rejected so the result stays inside
/// `ref_chart_dir`.
pub fn chart_path(ref_chart_dir: &Path, location: &str) -> anyhow::Result<PathBuf> {
    let relative = Path::new(location);
    let plain = relative.components().next().is_some()
        && relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    if !plain {
        error!(location, "chart location escapes the reference chart directory");
        return Err(HelmsmanError::ChartExtraction {
            location: location.to_string(),
            reason: "chart location must be a relative path inside the reference chart directory"
                .to_string(),
            temporary_folder: None,
        }
        .into());
    }
    Ok(ref_chart_dir.join(relative))
}

/// Directory holding the chart files inside an unpacked archive.
fn chart_root(unpacked: &Path) -> std::io::Result<PathBuf> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(unpacked)? {
        let entry = entry?;
        if IGNORED_ENTRIES.iter().any(|ignored| entry.file_name() == *ignored) {
            continue;
        }
        entries.push(entry);
    }

    if let [single] = entries.as_slice() {
        if single.file_type()?.is_dir() {
            return Ok(single.path());
        }
    }
    Ok(unpacked.to_path_buf())
}

/// Remove a scratch folder left by extraction. Failure is logged only.
pub fn remove_temporary_folder(folder: &Path) {
    if !folder.exists() {
        return;
    }
    if let Err(e) = fs::remove_dir_all(folder) {
        error!(error = %e, folder = %folder.display(), "error in deleting temp dir");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::io::Write;
    use zip::{ZipWriter, write::SimpleFileOptions};

    struct NoChartRefs;

    #[async_trait]
    impl ChartRefPersistence for NoChartRefs {
        async fn chart_ref_find_by_id(&self, _id: i32) -> anyhow::Result<Option<ChartRefInfo>> {
            Ok(None)
        }
    }

    fn service() -> ChartRefService<NoChartRefs> {
        ChartRefService::new(Arc::new(NoChartRefs))
    }

    fn archive(files: &[(&str, &str)]) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        {
            let mut zip = ZipWriter::new(&mut buffer);
            let options = SimpleFileOptions::default();
            for (name, content) in files {
                zip.start_file(*name, options).unwrap();
                zip.write_all(content.as_bytes()).unwrap();
            }
            zip.finish().unwrap();
        }
        buffer.into_inner()
    }

    #[tokio::test]
    async fn test_find_by_id_missing() {
        let err = service().find_by_id(3).await.unwrap_err();
        assert!(matches!(
            HelmsmanError::from_anyhow(&err),
            Some(HelmsmanError::ChartRefNotExist(3))
        ));
    }

    #[test]
    fn test_extract_single_top_level_directory() {
        let dir = tempfile::tempdir().unwrap();
        let data = archive(&[
            ("custom/Chart.yaml", "name: custom\n"),
            ("custom/templates/deployment.yaml", "kind: Deployment\n"),
        ]);

        let info = service()
            .extract_chart_if_missing(&data, dir.path(), "custom-chart_1-0-0")
            .unwrap();

        let chart = dir.path().join("custom-chart_1-0-0");
        assert!(chart.join("Chart.yaml").is_file());
        assert!(chart.join("templates/deployment.yaml").is_file());
        assert_eq!(info.chart_location, "custom-chart_1-0-0");
        assert!(info.temporary_folder.starts_with(dir.path()));

        remove_temporary_folder(&info.temporary_folder);
        assert!(!info.temporary_folder.exists());
        assert!(chart.exists());
    }

    #[test]
    fn test_extract_flat_archive() {
        let dir = tempfile::tempdir().unwrap();
        let data = archive(&[("Chart.yaml", "name: flat\n"), ("values.yaml", "replicas: 1\n")]);

        let info = service()
            .extract_chart_if_missing(&data, dir.path(), "flat")
            .unwrap();

        assert!(dir.path().join("flat/values.yaml").is_file());
        // The scratch folder itself became the chart
        assert!(!info.temporary_folder.exists());
        remove_temporary_folder(&info.temporary_folder);
    }

    #[test]
    fn test_existing_location_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let existing = dir.path().join("custom");
        fs::create_dir_all(&existing).unwrap();
        fs::write(existing.join("Chart.yaml"), "name: original\n").unwrap();

        let data = archive(&[("custom/Chart.yaml", "name: replaced\n")]);
        let info = service()
            .extract_chart_if_missing(&data, dir.path(), "custom")
            .unwrap();

        let content = fs::read_to_string(existing.join("Chart.yaml")).unwrap();
        assert_eq!(content, "name: original\n");
        assert!(info.temporary_folder.exists());
    }

    #[test]
    fn test_invalid_archive_reports_temporary_folder() {
        let dir = tempfile::tempdir().unwrap();

        let err = service()
            .extract_chart_if_missing(b"not a zip", dir.path(), "broken")
            .unwrap_err();

        match HelmsmanError::from_anyhow(&err) {
            Some(HelmsmanError::ChartExtraction {
                location,
                temporary_folder: Some(folder),
                ..
            }) => {
                assert_eq!(location, "broken");
                assert!(folder.exists());
                remove_temporary_folder(folder);
                assert!(!folder.exists());
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(!dir.path().join("broken").exists());
    }

    #[test]
    fn test_chart_path_rejects_escaping_locations() {
        let base = Path::new("/srv/refcharts");
        assert_eq!(
            chart_path(base, "reference-chart_1-0-0").unwrap(),
            base.join("reference-chart_1-0-0")
        );
        assert_eq!(
            chart_path(base, "custom/1.0.0").unwrap(),
            base.join("custom/1.0.0")
        );

        for location in ["", "/etc/helm", "../outside", "custom/../../outside"] {
            let err = chart_path(base, location).unwrap_err();
            assert!(
                matches!(
                    HelmsmanError::from_anyhow(&err),
                    Some(HelmsmanError::ChartExtraction {
                        temporary_folder: None,
                        ..
                    })
                ),
                "location {:?} was accepted",
                location
            );
        }
    }

    #[test]
    fn test_extract_rejects_location_outside_ref_dir() {
        let root = tempfile::tempdir().unwrap();
        let ref_dir = root.path().join("refcharts");
        fs::create_dir_all(&ref_dir).unwrap();
        let data = archive(&[("custom/Chart.yaml", "name: custom\n")]);

        let err = service()
            .extract_chart_if_missing(&data, &ref_dir, "../escaped")
            .unwrap_err();

        assert!(matches!(
            HelmsmanError::from_anyhow(&err),
            Some(HelmsmanError::ChartExtraction { .. })
        ));
        assert!(!root.path().join("escaped").exists());
        assert_eq!(fs::read_dir(&ref_dir).unwrap().count(), 0);
    }
}

//! Chart directory materialization
//!
//! A chart is built by copying a reference template into a fresh directory
//! under the working dir and stamping its `Chart.yaml` with the app metadata.

use std::fs;
use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::model::ChartMetadata;

const CHART_FILE: &str = "Chart.yaml";

#[derive(Clone, Debug)]
pub struct ChartTemplateService {
    chart_working_dir: PathBuf,
}

impl ChartTemplateService {
    pub fn new(chart_working_dir: impl Into<PathBuf>) -> Self {
        Self {
            chart_working_dir: chart_working_dir.into(),
        }
    }

    pub fn chart_working_dir(&self) -> &Path {
        &self.chart_working_dir
    }

    /// Copy `reference_template_path` into a new directory and write `metadata`
    /// into its `Chart.yaml`. Returns the new directory.
    ///
    /// Keys of an existing `Chart.yaml` other than the metadata are preserved.
    pub fn build_chart(
        &self,
        metadata: &ChartMetadata,
        reference_template_path: &Path,
    ) -> anyhow::Result<PathBuf> {
        if !reference_template_path.is_dir() {
            anyhow::bail!(
                "reference template not found: {}",
                reference_template_path.display()
            );
        }

        let chart_dir = self.chart_working_dir.join(Uuid::new_v4().to_string());
        fs::create_dir_all(&chart_dir)?;

        let built = copy_dir_all(reference_template_path, &chart_dir)
            .map_err(anyhow::Error::from)
            .and_then(|_| write_chart_metadata(&chart_dir, metadata));
        if let Err(e) = built {
            error!(
                error = %e,
                reference_template = %reference_template_path.display(),
                "error in building chart"
            );
            self.cleanup(&chart_dir);
            return Err(e);
        }

        info!(
            name = %metadata.name,
            version = %metadata.version,
            path = %chart_dir.display(),
            "chart built"
        );
        Ok(chart_dir)
    }

    /// Remove a built chart directory. Failure is logged only.
    pub fn cleanup(&self, chart_dir: &Path) {
        match fs::remove_dir_all(chart_dir) {
            Ok(()) => debug!(path = %chart_dir.display(), "chart directory removed"),
            Err(e) => {
                error!(error = %e, path = %chart_dir.display(), "error in removing chart directory")
            }
        }
    }
}

// Symlinks are followed, the copy holds plain files and directories only
fn copy_dir_all(src: &Path, dst: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dst)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let target = dst.join(entry.file_name());
        if fs::metadata(entry.path())?.is_dir() {
            copy_dir_all(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

fn write_chart_metadata(chart_dir: &Path, metadata: &ChartMetadata) -> anyhow::Result<()> {
    let chart_file = chart_dir.join(CHART_FILE);

    let mut chart = if chart_file.is_file() {
        match serde_yaml::from_str::<Value>(&fs::read_to_string(&chart_file)?)? {
            Value::Mapping(mapping) => mapping,
            Value::Null => Mapping::new(),
            _ => anyhow::bail!("{} is not a mapping", chart_file.display()),
        }
    } else {
        Mapping::new()
    };

    chart.insert("apiVersion".into(), metadata.api_version.clone().into());
    chart.insert("name".into(), metadata.name.clone().into());
    chart.insert("version".into(), metadata.version.clone().into());

    fs::write(&chart_file, serde_yaml::to_string(&chart)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_template(root: &Path) -> PathBuf {
        let template = root.join("reference-chart_4-18-0");
        fs::create_dir_all(template.join("templates")).unwrap();
        fs::write(
            template.join(CHART_FILE),
            "apiVersion: v1\nname: reference-chart\nversion: 4.18.0\ndescription: base chart\n",
        )
        .unwrap();
        fs::write(template.join("values.yaml"), "replicaCount: 1\n").unwrap();
        fs::write(template.join("templates/deployment.yaml"), "kind: Deployment\n").unwrap();
        template
    }

    fn read_chart(dir: &Path) -> Mapping {
        serde_yaml::from_str(&fs::read_to_string(dir.join(CHART_FILE)).unwrap()).unwrap()
    }

    #[test]
    fn test_build_chart_copies_template_and_rewrites_metadata() {
        let root = tempfile::tempdir().unwrap();
        let template = reference_template(root.path());
        let service = ChartTemplateService::new(root.path().join("work"));

        let dir = service
            .build_chart(&ChartMetadata::new("payments-api", "4.18.0"), &template)
            .unwrap();

        assert!(dir.starts_with(service.chart_working_dir()));
        assert!(dir.join("values.yaml").is_file());
        assert!(dir.join("templates/deployment.yaml").is_file());

        let chart = read_chart(&dir);
        assert_eq!(chart.get("name").and_then(Value::as_str), Some("payments-api"));
        assert_eq!(chart.get("version").and_then(Value::as_str), Some("4.18.0"));
        assert_eq!(chart.get("apiVersion").and_then(Value::as_str), Some("v1"));
        assert_eq!(
            chart.get("description").and_then(Value::as_str),
            Some("base chart")
        );

        // The reference template is untouched
        let original = read_chart(&template);
        assert_eq!(
            original.get("name").and_then(Value::as_str),
            Some("reference-chart")
        );
    }

    #[test]
    fn test_build_chart_without_chart_file() {
        let root = tempfile::tempdir().unwrap();
        let template = root.path().join("bare");
        fs::create_dir_all(&template).unwrap();
        fs::write(template.join("values.yaml"), "a: 1\n").unwrap();
        let service = ChartTemplateService::new(root.path().join("work"));

        let dir = service
            .build_chart(&ChartMetadata::new("web", "1.0.0"), &template)
            .unwrap();

        let chart = read_chart(&dir);
        assert_eq!(chart.get("name").and_then(Value::as_str), Some("web"));
        assert_eq!(chart.len(), 3);
    }

    #[test]
    fn test_each_build_gets_its_own_directory() {
        let root = tempfile::tempdir().unwrap();
        let template = reference_template(root.path());
        let service = ChartTemplateService::new(root.path().join("work"));
        let metadata = ChartMetadata::new("web", "4.18.0");

        let first = service.build_chart(&metadata, &template).unwrap();
        let second = service.build_chart(&metadata, &template).unwrap();
        assert_ne!(first, second);

        service.cleanup(&first);
        assert!(!first.exists());
        assert!(second.exists());
    }

    #[test]
    fn test_missing_reference_template() {
        let root = tempfile::tempdir().unwrap();
        let service = ChartTemplateService::new(root.path().join("work"));

        let result = service.build_chart(
            &ChartMetadata::new("web", "1.0.0"),
            &root.path().join("missing"),
        );
        assert!(result.is_err());
        assert!(!service.chart_working_dir().exists());
    }

    #[test]
    fn test_invalid_chart_file_removes_partial_build() {
        let root = tempfile::tempdir().unwrap();
        let template = root.path().join("broken");
        fs::create_dir_all(&template).unwrap();
        fs::write(template.join(CHART_FILE), "- just\n- a list\n").unwrap();
        let work = root.path().join("work");
        let service = ChartTemplateService::new(&work);

        let result = service.build_chart(&ChartMetadata::new("web", "1.0.0"), &template);
        assert!(result.is_err());
        assert_eq!(fs::read_dir(&work).unwrap().count(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_build_chart_follows_symlinked_directories() {
        let root = tempfile::tempdir().unwrap();
        let template = reference_template(root.path());
        let shared = root.path().join("shared-templates");
        fs::create_dir_all(&shared).unwrap();
        fs::write(shared.join("configmap.yaml"), "kind: ConfigMap\n").unwrap();
        std::os::unix::fs::symlink(&shared, template.join("shared")).unwrap();
        let service = ChartTemplateService::new(root.path().join("work"));

        let dir = service
            .build_chart(&ChartMetadata::new("web", "4.18.0"), &template)
            .unwrap();

        let copied = dir.join("shared");
        assert!(copied.join("configmap.yaml").is_file());
        assert!(!fs::symlink_metadata(&copied).unwrap().file_type().is_symlink());
    }
}

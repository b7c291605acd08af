//! Error types for Helmsman
//!
//! Services and persistence backends return `anyhow::Result`. Domain failures
//! are raised as `HelmsmanError` so callers can match on them with
//! [`HelmsmanError::from_anyhow`] instead of comparing messages.

use std::path::PathBuf;

/// Application-specific error types
#[derive(thiserror::Error, Debug)]
pub enum HelmsmanError {
    #[error("cluster '{0}' not exist")]
    ClusterNotExist(i32),

    #[error("container already present in the provided pod")]
    ContainerAlreadyPresent {
        cluster_id: i32,
        namespace: String,
        pod_name: String,
        container_name: String,
    },

    #[error("chart '{0}' not exist")]
    ChartNotExist(i32),

    #[error("chart ref '{0}' not exist")]
    ChartRefNotExist(i32),

    #[error("invalid container action: {0}")]
    InvalidContainerAction(String),

    #[error("failed to extract chart into {location}: {reason}")]
    ChartExtraction {
        location: String,
        reason: String,
        /// Scratch directory left behind by the failed extraction, if any
        temporary_folder: Option<PathBuf>,
    },

    #[error("configuration error: {0}")]
    ConfigError(String),
}

impl HelmsmanError {
    /// Look through an `anyhow::Error` for a domain error.
    pub fn from_anyhow(err: &anyhow::Error) -> Option<&HelmsmanError> {
        err.downcast_ref::<HelmsmanError>()
    }

    /// True for the lookup failures that map to "resource not found".
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            HelmsmanError::ClusterNotExist(_)
                | HelmsmanError::ChartNotExist(_)
                | HelmsmanError::ChartRefNotExist(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_container_message() {
        let err = HelmsmanError::ContainerAlreadyPresent {
            cluster_id: 1,
            namespace: "default".to_string(),
            pod_name: "web-0".to_string(),
            container_name: "debugger".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "container already present in the provided pod"
        );
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_downcast_through_anyhow() {
        let err: anyhow::Error = HelmsmanError::ChartRefNotExist(7).into();
        let domain = HelmsmanError::from_anyhow(&err).expect("domain error");
        assert!(domain.is_not_found());
        assert!(matches!(domain, HelmsmanError::ChartRefNotExist(7)));
    }

    #[test]
    fn test_foreign_error_is_not_domain() {
        let err = anyhow::anyhow!("connection reset");
        assert!(HelmsmanError::from_anyhow(&err).is_none());
    }
}

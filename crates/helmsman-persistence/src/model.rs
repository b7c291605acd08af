//! Domain model types for the persistence abstraction layer
//!
//! These types are used as arguments and return values of the persistence
//! traits, decoupled from the SeaORM entities.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use helmsman_common::HelmsmanError;

/// Cluster row with its credential map decoded
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterInfo {
    pub id: i32,
    pub cluster_name: String,
    pub server_url: String,
    pub config: HashMap<String, String>,
    pub insecure_skip_tls_verify: bool,
    pub active: bool,
}

/// Action performed on an ephemeral container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerAction {
    Create,
    Access,
    Terminate,
}

impl ContainerAction {
    /// Code stored in `ephemeral_container_action.action_type`
    pub fn code(self) -> i32 {
        match self {
            ContainerAction::Create => 0,
            ContainerAction::Access => 1,
            ContainerAction::Terminate => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ContainerAction::Create => "create",
            ContainerAction::Access => "access",
            ContainerAction::Terminate => "terminate",
        }
    }
}

impl TryFrom<i32> for ContainerAction {
    type Error = HelmsmanError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(ContainerAction::Create),
            1 => Ok(ContainerAction::Access),
            2 => Ok(ContainerAction::Terminate),
            other => Err(HelmsmanError::InvalidContainerAction(other.to_string())),
        }
    }
}

impl fmt::Display for ContainerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ContainerAction {
    type Err = HelmsmanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "create" => Ok(ContainerAction::Create),
            "access" => Ok(ContainerAction::Access),
            "terminate" => Ok(ContainerAction::Terminate),
            _ => Err(HelmsmanError::InvalidContainerAction(s.to_string())),
        }
    }
}

/// Ephemeral container row. `id` is 0 until the row is saved.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EphemeralContainerInfo {
    pub id: i32,
    pub name: String,
    pub cluster_id: i32,
    pub namespace: String,
    pub pod_name: String,
    pub target_container: String,
    pub config: String,
    pub is_externally_created: bool,
}

/// Audit trail row. `id` is 0 until the row is saved.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EphemeralContainerActionInfo {
    pub id: i32,
    pub ephemeral_container_id: i32,
    pub action_type: ContainerAction,
    pub performed_by: i32,
    pub performed_at: DateTime<Utc>,
}

/// Chart reference (template) row
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartRefInfo {
    pub id: i32,
    pub location: String,
    pub version: String,
    pub name: Option<String>,
    #[serde(skip)]
    pub chart_data: Option<Vec<u8>>,
    pub user_uploaded: bool,
    pub active: bool,
}

/// Chart row of an application
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartInfo {
    pub id: i32,
    pub app_id: i32,
    pub chart_ref_id: i32,
    pub chart_name: String,
    pub chart_version: String,
    pub chart_location: String,
    pub reference_template: String,
    pub latest: bool,
    pub active: bool,
    pub updated_by: i32,
}

/// How a deployment obtains its chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseMode {
    /// The deployment owns a versioned copy of its chart
    #[default]
    Create,
    /// The deployment reuses the chart artifact of another release
    Link,
}

impl ReleaseMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ReleaseMode::Create => "create",
            ReleaseMode::Link => "link",
        }
    }
}

impl fmt::Display for ReleaseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ReleaseMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(ReleaseMode::Create),
            "link" => Ok(ReleaseMode::Link),
            _ => Err(format!("Invalid release mode: {}", s)),
        }
    }
}

/// Deployment configuration of an app in an environment. `id` is 0 until saved.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentConfig {
    pub id: i32,
    pub app_id: i32,
    pub environment_id: i32,
    pub chart_location: String,
    pub release_mode: ReleaseMode,
    pub active: bool,
}

impl DeploymentConfig {
    pub fn is_linked_release(&self) -> bool {
        self.release_mode == ReleaseMode::Link
    }

    pub fn chart_location(&self) -> &str {
        &self.chart_location
    }

    pub fn set_chart_location(&mut self, location: impl Into<String>) {
        self.chart_location = location.into();
    }
}

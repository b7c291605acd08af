//! Deployment history request and response types

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Paginated listing of the deployments of a CD pipeline
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CdPipelineDeploymentHistoryListReq {
    pub pipeline_id: i32,
    pub app_id: i32,
    pub env_id: i32,
    pub offset: i32,
    pub limit: i32,
}

/// Config snapshots of one component recorded for a deployment
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CdPipelineDeploymentHistoryConfigListReq {
    pub base_configuration_id: i32,
    pub pipeline_id: i32,
    pub history_component: HistoryComponent,
    pub history_component_name: String,
}

/// Component whose configuration history is tracked per deployment
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HistoryComponent {
    #[serde(rename = "DEPLOYMENT_TEMPLATE")]
    DeploymentTemplate,
    #[serde(rename = "CONFIGMAP")]
    ConfigMap,
    #[serde(rename = "SECRET")]
    Secret,
    #[serde(rename = "PIPELINE_STRATEGY")]
    PipelineStrategy,
}

impl HistoryComponent {
    pub fn as_str(self) -> &'static str {
        match self {
            HistoryComponent::DeploymentTemplate => "DEPLOYMENT_TEMPLATE",
            HistoryComponent::ConfigMap => "CONFIGMAP",
            HistoryComponent::Secret => "SECRET",
            HistoryComponent::PipelineStrategy => "PIPELINE_STRATEGY",
        }
    }
}

impl fmt::Display for HistoryComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for HistoryComponent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DEPLOYMENT_TEMPLATE" => Ok(HistoryComponent::DeploymentTemplate),
            "CONFIGMAP" => Ok(HistoryComponent::ConfigMap),
            "SECRET" => Ok(HistoryComponent::Secret),
            "PIPELINE_STRATEGY" => Ok(HistoryComponent::PipelineStrategy),
            _ => Err(format!("Invalid history component: {}", s)),
        }
    }
}

/// A CD workflow run together with the artifact it deployed
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CdWorkflowWithArtifact {
    pub id: i32,
    pub cd_workflow_id: i32,
    pub name: String,
    pub status: String,
    pub pod_status: String,
    pub message: String,
    pub started_on: Option<DateTime<Utc>>,
    pub finished_on: Option<DateTime<Utc>>,
    pub pipeline_id: i32,
    pub namespace: String,
    pub log_file_path: String,
    pub triggered_by: i32,
    pub email_id: String,
    pub image: String,
    pub ci_artifact_id: i32,
    pub workflow_type: String,
    #[serde(default)]
    pub image_release_tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_comment: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentHistoryResp {
    pub cd_workflows: Vec<CdWorkflowWithArtifact>,
    pub tags_editable: bool,
    /// Unique list of release tags that exist in the app
    pub app_release_tag_names: Vec<String>,
    pub hide_image_tagging_hard_delete: bool,
}

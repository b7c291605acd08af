//! Deployment data types

pub mod chart;
pub mod history;

pub use chart::{ChartDataInfo, ChartMetadata, ChartOverride};
pub use history::{
    CdPipelineDeploymentHistoryConfigListReq, CdPipelineDeploymentHistoryListReq,
    CdWorkflowWithArtifact, DeploymentHistoryResp, HistoryComponent,
};

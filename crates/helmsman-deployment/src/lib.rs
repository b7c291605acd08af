//! Helmsman Deployment - chart materialization for deployments
//!
//! This crate provides:
//! - `DeploymentTemplateService`: heals drifted chart locations and builds the
//!   chart directory handed to Helm
//! - Chart-ref and chart-template services it is built on
//! - `DeploymentConfigService` for reading and saving deployment configs
//! - Deployment history request/response types

pub mod model;
pub mod service;

pub use model::{ChartDataInfo, ChartMetadata, ChartOverride};
pub use service::{
    ChartRefService, ChartTemplateService, DeploymentConfigService, DeploymentTemplateService,
};

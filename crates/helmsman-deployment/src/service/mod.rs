//! Deployment service layer

pub mod chart_ref;
pub mod chart_template;
pub mod deployment_config;
pub mod deployment_template;

pub use chart_ref::ChartRefService;
pub use chart_template::ChartTemplateService;
pub use deployment_config::DeploymentConfigService;
pub use deployment_template::DeploymentTemplateService;

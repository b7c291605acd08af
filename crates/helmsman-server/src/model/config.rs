//! Configuration management for the Helmsman server
//!
//! Values come from `conf/application.yml`, then `HELMSMAN__`-prefixed
//! environment variables (`HELMSMAN__DB__URL` sets `helmsman.db.url`), then
//! command line overrides.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use config::{Config, Environment, File};

use helmsman_common::HelmsmanError;
use helmsman_persistence::model::ContainerAction;

use crate::startup::LoggingConfig;

pub const DEFAULT_CONFIG_FILE: &str = "conf/application.yml";

pub const DB_URL: &str = "helmsman.db.url";
pub const DB_POOL_MAX_CONNECTIONS: &str = "helmsman.db.pool.max_connections";
pub const DB_POOL_MIN_CONNECTIONS: &str = "helmsman.db.pool.min_connections";
pub const DB_POOL_CONNECT_TIMEOUT_SECS: &str = "helmsman.db.pool.connect_timeout_secs";
pub const DB_SQLX_LOGGING: &str = "helmsman.db.sqlx_logging";
pub const CHART_REF_DIR: &str = "helmsman.chart.ref_dir";
pub const CHART_WORKING_DIR: &str = "helmsman.chart.working_dir";
pub const LOGS_PATH: &str = "helmsman.logs.path";
pub const LOGS_LEVEL: &str = "helmsman.logs.level";
pub const LOGS_CONSOLE_ENABLED: &str = "helmsman.logs.console_enabled";
pub const LOGS_FILE_ENABLED: &str = "helmsman.logs.file_enabled";
pub const LOGS_ROTATION: &str = "helmsman.logs.rotation";

/// Command line arguments
#[derive(Debug, Parser)]
#[command(name = "helmsman-server", version, about)]
pub struct Cli {
    /// Configuration file
    #[arg(short = 'c', long = "config", default_value = DEFAULT_CONFIG_FILE)]
    pub config_file: PathBuf,
    #[arg(long = "db-url", env = "DATABASE_URL")]
    pub database_url: Option<String>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create or upgrade the database schema
    Migrate,
    /// Print the connection config of a cluster
    ClusterConfig {
        #[arg(long)]
        cluster_id: i32,
        /// Print credentials instead of masking them
        #[arg(long)]
        show_secrets: bool,
    },
    /// Record an action on an ephemeral container
    AuditContainer {
        #[arg(long)]
        cluster_id: i32,
        #[arg(long)]
        namespace: String,
        #[arg(long)]
        pod_name: String,
        #[arg(long)]
        container_name: String,
        #[arg(long, default_value = "")]
        target_container: String,
        #[arg(long, default_value = "")]
        image: String,
        /// Pod manifest stored instead of the basic container data
        #[arg(long)]
        manifest_file: Option<PathBuf>,
        #[arg(long, default_value = "create")]
        action: ContainerAction,
        #[arg(long, default_value_t = helmsman_common::SYSTEM_USER_ID)]
        user_id: i32,
    },
    /// List the recorded actions of an ephemeral container
    AuditTrail {
        #[arg(long)]
        cluster_id: i32,
        #[arg(long)]
        namespace: String,
        #[arg(long)]
        pod_name: String,
        #[arg(long)]
        container_name: String,
    },
    /// Build the chart directory of an app deployment
    BuildChart {
        #[arg(long)]
        app_name: String,
        #[arg(long)]
        chart_id: i32,
        #[arg(long)]
        deployment_config_id: i32,
    },
}

/// Connection pool settings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    pub sqlx_logging: bool,
}

/// Application configuration loaded from config files and environment
#[derive(Clone, Debug, Default)]
pub struct Configuration {
    pub config: Config,
}

impl Configuration {
    pub fn new(cli: &Cli) -> anyhow::Result<Self> {
        let mut config_builder = Config::builder()
            .add_source(File::from(cli.config_file.as_path()).required(false))
            .add_source(
                Environment::with_prefix("helmsman")
                    .prefix_separator("__")
                    .separator("__")
                    .keep_prefix(true)
                    .try_parsing(true),
            );

        if let Some(url) = &cli.database_url {
            config_builder = config_builder.set_override(DB_URL, url.as_str())?;
        }

        let config = config_builder.build().map_err(|e| {
            HelmsmanError::ConfigError(format!(
                "failed to load {}: {}",
                cli.config_file.display(),
                e
            ))
        })?;

        Ok(Configuration { config })
    }

    // ========================================================================
    // Database Configuration
    // ========================================================================

    pub fn database_settings(&self) -> anyhow::Result<DatabaseSettings> {
        let url = self.config.get_string(DB_URL).map_err(|_| {
            HelmsmanError::ConfigError(format!(
                "{} is not set, use --db-url or DATABASE_URL",
                DB_URL
            ))
        })?;

        Ok(DatabaseSettings {
            url,
            max_connections: self.config.get_int(DB_POOL_MAX_CONNECTIONS).unwrap_or(10) as u32,
            min_connections: self.config.get_int(DB_POOL_MIN_CONNECTIONS).unwrap_or(1) as u32,
            connect_timeout_secs: self
                .config
                .get_int(DB_POOL_CONNECT_TIMEOUT_SECS)
                .unwrap_or(30) as u64,
            sqlx_logging: self.config.get_bool(DB_SQLX_LOGGING).unwrap_or(false),
        })
    }

    // ========================================================================
    // Chart Configuration
    // ========================================================================

    /// Directory holding the reference chart templates
    pub fn ref_chart_dir(&self) -> PathBuf {
        self.config
            .get_string(CHART_REF_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("scripts/refcharts"))
    }

    /// Directory charts are built into
    pub fn chart_working_dir(&self) -> PathBuf {
        self.config
            .get_string(CHART_WORKING_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| std::env::temp_dir().join("helmsman-charts"))
    }

    // ========================================================================
    // Logging Configuration
    // ========================================================================

    /// Logging settings. Keys absent from the configuration fall back to
    /// the `HELMSMAN_LOG_*` environment variables.
    pub fn logging_config(&self) -> LoggingConfig {
        let env = LoggingConfig::from_env();

        LoggingConfig::from_config(
            self.config
                .get_string(LOGS_PATH)
                .ok()
                .or_else(|| Some(env.log_dir.display().to_string())),
            self.config
                .get_bool(LOGS_CONSOLE_ENABLED)
                .unwrap_or(env.console_output),
            self.config
                .get_bool(LOGS_FILE_ENABLED)
                .unwrap_or(env.file_logging),
            &self
                .config
                .get_string(LOGS_LEVEL)
                .unwrap_or_else(|_| env.console_level.to_string()),
            self.config
                .get_string(LOGS_ROTATION)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(env.rotation),
        )
    }
}

//! Database connection and schema bootstrap

use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

use helmsman_migration::{Migrator, MigratorTrait};

use crate::model::config::DatabaseSettings;

pub async fn connect(settings: &DatabaseSettings) -> anyhow::Result<DatabaseConnection> {
    let mut opt = ConnectOptions::new(settings.url.clone());
    opt.max_connections(settings.max_connections)
        .min_connections(settings.min_connections)
        .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
        .sqlx_logging(settings.sqlx_logging);

    info!(
        max_connections = settings.max_connections,
        min_connections = settings.min_connections,
        connect_timeout = settings.connect_timeout_secs,
        sqlx_logging = settings.sqlx_logging,
        "Database connection pool configured"
    );

    Ok(Database::connect(opt).await?)
}

/// Apply every pending migration.
pub async fn migrate(db: &DatabaseConnection) -> anyhow::Result<usize> {
    let pending = Migrator::get_pending_migrations(db).await?.len();
    Migrator::up(db, None).await?;
    info!(applied = pending, "Database migrations applied");
    Ok(pending)
}

//! Helmsman Migration - schema of the service layer tables

pub use sea_orm_migration::prelude::*;

mod m20240601_000001_create_cluster_tables;
mod m20240601_000002_create_chart_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240601_000001_create_cluster_tables::Migration),
            Box::new(m20240601_000002_create_chart_tables::Migration),
        ]
    }
}

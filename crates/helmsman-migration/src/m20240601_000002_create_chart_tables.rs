//! Chart reference, chart and deployment config tables

use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

const FK_CHART_CHART_REF: &str = "fk_chart_chart_ref";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ChartRef::Table)
                    .if_not_exists()
                    .col(pk_auto(ChartRef::Id))
                    .col(string(ChartRef::Location))
                    .col(string(ChartRef::Version))
                    .col(string_null(ChartRef::Name))
                    .col(ColumnDef::new(ChartRef::ChartData).blob().null())
                    .col(boolean(ChartRef::UserUploaded).default(false))
                    .col(boolean(ChartRef::Active).default(true))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Chart::Table)
                    .if_not_exists()
                    .col(pk_auto(Chart::Id))
                    .col(integer(Chart::AppId))
                    .col(integer(Chart::ChartRefId))
                    .col(string(Chart::ChartName))
                    .col(string(Chart::ChartVersion))
                    .col(string(Chart::ChartLocation))
                    .col(string(Chart::ReferenceTemplate))
                    .col(boolean(Chart::Latest).default(false))
                    .col(boolean(Chart::Active).default(true))
                    .col(integer(Chart::UpdatedBy))
                    .col(date_time(Chart::UpdatedOn))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_CHART_CHART_REF)
                            .from(Chart::Table, Chart::ChartRefId)
                            .to(ChartRef::Table, ChartRef::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DeploymentConfig::Table)
                    .if_not_exists()
                    .col(pk_auto(DeploymentConfig::Id))
                    .col(integer(DeploymentConfig::AppId))
                    .col(integer(DeploymentConfig::EnvironmentId))
                    .col(string(DeploymentConfig::ChartLocation))
                    .col(string(DeploymentConfig::ReleaseMode).default("create"))
                    .col(boolean(DeploymentConfig::Active).default(true))
                    .col(integer(DeploymentConfig::UpdatedBy))
                    .col(date_time(DeploymentConfig::UpdatedOn))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DeploymentConfig::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Chart::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ChartRef::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ChartRef {
    Table,
    Id,
    Location,
    Version,
    Name,
    ChartData,
    UserUploaded,
    Active,
}

#[derive(DeriveIden)]
enum Chart {
    Table,
    Id,
    AppId,
    ChartRefId,
    ChartName,
    ChartVersion,
    ChartLocation,
    ReferenceTemplate,
    Latest,
    Active,
    UpdatedBy,
    UpdatedOn,
}

#[derive(DeriveIden)]
enum DeploymentConfig {
    Table,
    Id,
    AppId,
    EnvironmentId,
    ChartLocation,
    ReleaseMode,
    Active,
    UpdatedBy,
    UpdatedOn,
}

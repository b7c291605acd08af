//! Cluster and ephemeral container tables

use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

const IDX_EPHEMERAL_CONTAINER_NAME: &str = "idx_ephemeral_container_cluster_ns_pod_name";
const FK_ACTION_CONTAINER: &str = "fk_ephemeral_container_action_container";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Cluster::Table)
                    .if_not_exists()
                    .col(pk_auto(Cluster::Id))
                    .col(string(Cluster::ClusterName))
                    .col(string(Cluster::ServerUrl))
                    .col(text(Cluster::Config))
                    .col(boolean(Cluster::InsecureSkipTlsVerify).default(false))
                    .col(boolean(Cluster::Active).default(true))
                    .col(date_time(Cluster::CreatedOn))
                    .col(date_time(Cluster::UpdatedOn))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(EphemeralContainer::Table)
                    .if_not_exists()
                    .col(pk_auto(EphemeralContainer::Id))
                    .col(string(EphemeralContainer::Name))
                    .col(integer(EphemeralContainer::ClusterId))
                    .col(string(EphemeralContainer::Namespace))
                    .col(string(EphemeralContainer::PodName))
                    .col(string(EphemeralContainer::TargetContainer))
                    .col(text(EphemeralContainer::Config))
                    .col(boolean(EphemeralContainer::IsExternallyCreated).default(false))
                    .to_owned(),
            )
            .await?;

        // Closes the check-then-insert race between concurrent "create" audits
        manager
            .create_index(
                Index::create()
                    .name(IDX_EPHEMERAL_CONTAINER_NAME)
                    .table(EphemeralContainer::Table)
                    .col(EphemeralContainer::ClusterId)
                    .col(EphemeralContainer::Namespace)
                    .col(EphemeralContainer::PodName)
                    .col(EphemeralContainer::Name)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(EphemeralContainerAction::Table)
                    .if_not_exists()
                    .col(pk_auto(EphemeralContainerAction::Id))
                    .col(integer(EphemeralContainerAction::EphemeralContainerId))
                    .col(integer(EphemeralContainerAction::ActionType))
                    .col(integer(EphemeralContainerAction::PerformedBy))
                    .col(date_time(EphemeralContainerAction::PerformedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_ACTION_CONTAINER)
                            .from(
                                EphemeralContainerAction::Table,
                                EphemeralContainerAction::EphemeralContainerId,
                            )
                            .to(EphemeralContainer::Table, EphemeralContainer::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EphemeralContainerAction::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(EphemeralContainer::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Cluster::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Cluster {
    Table,
    Id,
    ClusterName,
    ServerUrl,
    Config,
    InsecureSkipTlsVerify,
    Active,
    CreatedOn,
    UpdatedOn,
}

#[derive(DeriveIden)]
enum EphemeralContainer {
    Table,
    Id,
    Name,
    ClusterId,
    Namespace,
    PodName,
    TargetContainer,
    Config,
    IsExternallyCreated,
}

#[derive(DeriveIden)]
enum EphemeralContainerAction {
    Table,
    Id,
    EphemeralContainerId,
    ActionType,
    PerformedBy,
    PerformedAt,
}

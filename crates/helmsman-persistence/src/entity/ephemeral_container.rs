//! `SeaORM` Entity for ephemeral_container table
//!
//! One row per debug container attached to a pod. The tuple
//! (cluster_id, namespace, pod_name, name) is unique.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "ephemeral_container")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub cluster_id: i32,
    pub namespace: String,
    pub pod_name: String,
    pub target_container: String,
    #[sea_orm(column_type = "Text")]
    pub config: String,
    pub is_externally_created: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::ephemeral_container_action::Entity")]
    EphemeralContainerAction,
}

impl Related<super::ephemeral_container_action::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EphemeralContainerAction.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

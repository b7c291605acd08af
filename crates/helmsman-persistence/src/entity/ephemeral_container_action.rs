//! `SeaORM` Entity for ephemeral_container_action table
//!
//! Append-only audit trail of actions performed on ephemeral containers.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "ephemeral_container_action")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub ephemeral_container_id: i32,
    /// 0 = create, 1 = access, 2 = terminate
    pub action_type: i32,
    pub performed_by: i32,
    pub performed_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::ephemeral_container::Entity",
        from = "Column::EphemeralContainerId",
        to = "super::ephemeral_container::Column::Id"
    )]
    EphemeralContainer,
}

impl Related<super::ephemeral_container::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EphemeralContainer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

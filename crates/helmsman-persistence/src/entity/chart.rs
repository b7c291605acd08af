//! `SeaORM` Entity for chart table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "chart")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub app_id: i32,
    pub chart_ref_id: i32,
    pub chart_name: String,
    pub chart_version: String,
    pub chart_location: String,
    pub reference_template: String,
    pub latest: bool,
    pub active: bool,
    pub updated_by: i32,
    pub updated_on: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::chart_ref::Entity",
        from = "Column::ChartRefId",
        to = "super::chart_ref::Column::Id"
    )]
    ChartRef,
}

impl Related<super::chart_ref::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ChartRef.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

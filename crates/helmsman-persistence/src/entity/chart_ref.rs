//! `SeaORM` Entity for chart_ref table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "chart_ref")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Directory name of the reference template under the reference chart dir
    pub location: String,
    pub version: String,
    pub name: Option<String>,
    /// Zip archive of a user uploaded chart
    #[sea_orm(column_type = "Blob", nullable)]
    pub chart_data: Option<Vec<u8>>,
    pub user_uploaded: bool,
    pub active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::chart::Entity")]
    Chart,
}

impl Related<super::chart::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Chart.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

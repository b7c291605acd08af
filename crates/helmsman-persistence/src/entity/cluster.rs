//! `SeaORM` Entity for cluster table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "cluster")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub cluster_name: String,
    pub server_url: String,
    /// JSON object of credential entries (bearer_token, tls_key, cert_data, cert_auth_data)
    #[sea_orm(column_type = "Text")]
    pub config: String,
    pub insecure_skip_tls_verify: bool,
    pub active: bool,
    pub created_on: DateTime,
    pub updated_on: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

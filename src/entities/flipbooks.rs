use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "flipbooks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[serde(skip)]
    #[sea_orm(column_type = "Blob")]
    pub pdf_file: Vec<u8>,
    pub pdf_filename: Option<String>,
    pub file_size: i64,
    pub checksum: String,
    pub page_count: Option<i32>,
    #[sea_orm(unique)]
    pub access_token: String,
    pub view_count: i64,
    pub last_viewed: Option<DateTimeUtc>,
    pub sequence: i32,
    pub is_published: bool,
    pub company_id: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Credit log row, one per debit attempt
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "llm_credit_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Correlation id (unique)
    #[sea_orm(unique)]
    pub tid: String,

    pub uid: i64,

    pub biz: String,

    pub amount: i64,

    /// `processing`, `success` or `failed`
    pub status: String,

    pub ctime: i64,

    pub utime: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

use crate::storage::UsageRecord;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Usage record row, one per charged request
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "llm_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Correlation id (unique)
    #[sea_orm(unique)]
    pub tid: String,

    pub uid: i64,

    pub biz: String,

    pub tokens: i64,

    pub amount: i64,

    #[sea_orm(column_type = "Text")]
    pub raw_output: String,

    pub ctime: i64,

    pub utime: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for UsageRecord {
    fn from(model: Model) -> Self {
        Self {
            tid: model.tid,
            uid: model.uid,
            biz: model.biz,
            tokens: model.tokens,
            amount: model.amount,
            raw_output: model.raw_output,
            ctime: model.ctime,
            utime: model.utime,
        }
    }
}

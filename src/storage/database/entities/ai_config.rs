use crate::core::types::BizConfig;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Business configuration row
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "ai_configs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Business key (unique)
    #[sea_orm(unique)]
    pub biz: String,

    pub model: String,

    /// Per-token price override
    pub price: Option<i64>,

    pub temperature: f32,

    pub top_p: f32,

    pub max_tokens: Option<i32>,

    #[sea_orm(column_type = "Text")]
    pub system_prompt: String,

    #[sea_orm(column_type = "Text")]
    pub prompt_template: String,

    /// Epoch milliseconds
    pub ctime: i64,

    pub utime: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for BizConfig {
    fn from(model: Model) -> Self {
        Self {
            biz: model.biz,
            model: model.model,
            price: model.price,
            temperature: model.temperature,
            top_p: model.top_p,
            max_tokens: model.max_tokens.and_then(|v| u32::try_from(v).ok()),
            system_prompt: model.system_prompt,
            prompt_template: model.prompt_template,
        }
    }
}

use crate::core::types::BizConfig;
use crate::storage::ConfigDao;
use crate::utils::current_timestamp_millis;
use crate::utils::error::{DispatchError, Result};
use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::*;
use tracing::{debug, info};

use super::super::entities::{self, ai_config};
use super::types::SeaOrmDatabase;

impl SeaOrmDatabase {
    /// Insert or update business configurations, keyed by business key
    pub async fn seed_configs(&self, configs: &[BizConfig]) -> Result<()> {
        for config in configs {
            self.upsert_config(config).await?;
        }
        info!("Seeded {} business configuration(s)", configs.len());
        Ok(())
    }

    pub async fn upsert_config(&self, config: &BizConfig) -> Result<()> {
        debug!("Upserting configuration for business: {}", config.biz);
        let now = current_timestamp_millis();
        let max_tokens = config
            .max_tokens
            .map(i32::try_from)
            .transpose()
            .map_err(|_| DispatchError::config(format!("max_tokens too large for {}", config.biz)))?;

        let active_model = ai_config::ActiveModel {
            id: NotSet,
            biz: Set(config.biz.clone()),
            model: Set(config.model.clone()),
            price: Set(config.price),
            temperature: Set(config.temperature),
            top_p: Set(config.top_p),
            max_tokens: Set(max_tokens),
            system_prompt: Set(config.system_prompt.clone()),
            prompt_template: Set(config.prompt_template.clone()),
            ctime: Set(now),
            utime: Set(now),
        };

        entities::AiConfig::insert(active_model)
            .on_conflict(
                OnConflict::column(ai_config::Column::Biz)
                    .update_columns([
                        ai_config::Column::Model,
                        ai_config::Column::Price,
                        ai_config::Column::Temperature,
                        ai_config::Column::TopP,
                        ai_config::Column::MaxTokens,
                        ai_config::Column::SystemPrompt,
                        ai_config::Column::PromptTemplate,
                        ai_config::Column::Utime,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(DispatchError::Database)?;

        Ok(())
    }
}

#[async_trait]
impl ConfigDao for SeaOrmDatabase {
    async fn find_config(&self, biz: &str) -> Result<Option<BizConfig>> {
        debug!("Finding configuration for business: {}", biz);
        let model = entities::AiConfig::find()
            .filter(ai_config::Column::Biz.eq(biz))
            .one(&self.db)
            .await
            .map_err(DispatchError::Database)?;

        Ok(model.map(BizConfig::from))
    }
}

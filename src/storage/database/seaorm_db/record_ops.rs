use crate::storage::{UsageLogRepository, UsageRecord};
use crate::utils::error::{DispatchError, Result};
use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::*;
use tracing::debug;

use super::super::entities::{self, llm_record};
use super::types::SeaOrmDatabase;

impl SeaOrmDatabase {
    /// Find the usage record of a correlation id
    pub async fn find_record(&self, tid: &str) -> Result<Option<UsageRecord>> {
        let model = entities::LlmRecord::find()
            .filter(llm_record::Column::Tid.eq(tid))
            .one(&self.db)
            .await
            .map_err(DispatchError::Database)?;

        Ok(model.map(UsageRecord::from))
    }

    /// Count all usage records
    pub async fn count_records(&self) -> Result<u64> {
        entities::LlmRecord::find()
            .count(&self.db)
            .await
            .map_err(DispatchError::Database)
    }
}

#[async_trait]
impl UsageLogRepository for SeaOrmDatabase {
    async fn append(&self, record: UsageRecord) -> Result<()> {
        debug!("Appending usage record: {}", record.tid);

        let active_model = llm_record::ActiveModel {
            id: NotSet,
            tid: Set(record.tid),
            uid: Set(record.uid),
            biz: Set(record.biz),
            tokens: Set(record.tokens),
            amount: Set(record.amount),
            raw_output: Set(record.raw_output),
            ctime: Set(record.ctime),
            utime: Set(record.utime),
        };

        // A retried request carries the same tid; its record is already stored
        entities::LlmRecord::insert(active_model)
            .on_conflict(
                OnConflict::column(llm_record::Column::Tid)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(DispatchError::Database)?;

        Ok(())
    }
}

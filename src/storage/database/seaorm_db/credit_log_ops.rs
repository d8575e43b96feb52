use crate::storage::{CreditLog, CreditLogRepository, CreditStatus};
use crate::utils::error::{DispatchError, Result};
use async_trait::async_trait;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::*;
use tracing::debug;

use super::super::entities::{self, llm_credit_log};
use super::types::SeaOrmDatabase;

impl SeaOrmDatabase {
    /// Find the credit log entry of a correlation id
    pub async fn find_credit_log(&self, tid: &str) -> Result<Option<CreditLog>> {
        let model = entities::LlmCreditLog::find()
            .filter(llm_credit_log::Column::Tid.eq(tid))
            .one(&self.db)
            .await
            .map_err(DispatchError::Database)?;

        model
            .map(|m| -> Result<CreditLog> {
                Ok(CreditLog {
                    status: m.status.parse()?,
                    tid: m.tid,
                    uid: m.uid,
                    biz: m.biz,
                    amount: m.amount,
                    ctime: m.ctime,
                    utime: m.utime,
                })
            })
            .transpose()
    }
}

/// A `success` entry is final: later saves under the same tid leave it untouched
#[async_trait]
impl CreditLogRepository for SeaOrmDatabase {
    async fn save(&self, log: CreditLog) -> Result<()> {
        debug!("Saving credit log {} as {}", log.tid, log.status);

        let active_model = llm_credit_log::ActiveModel {
            id: NotSet,
            tid: Set(log.tid),
            uid: Set(log.uid),
            biz: Set(log.biz),
            amount: Set(log.amount),
            status: Set(log.status.as_str().to_string()),
            ctime: Set(log.ctime),
            utime: Set(log.utime),
        };

        entities::LlmCreditLog::insert(active_model)
            .on_conflict(
                OnConflict::column(llm_credit_log::Column::Tid)
                    .update_columns([
                        llm_credit_log::Column::Status,
                        llm_credit_log::Column::Amount,
                        llm_credit_log::Column::Utime,
                    ])
                    .action_and_where(
                        Expr::col((llm_credit_log::Entity, llm_credit_log::Column::Status))
                            .ne(CreditStatus::Success.as_str()),
                    )
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(DispatchError::Database)?;

        Ok(())
    }
}

//! Record handler
//!
//! Persists a usage record for every successful downstream call. The append is queued on the
//! request context and only runs once the request has been charged, so a failed debit never
//! leaves a usage record behind. Append failures are logged and swallowed.

use super::{Builder, Handler};
use crate::core::context::RequestContext;
use crate::core::types::{LlmRequest, LlmResponse};
use crate::storage::{UsageLogRepository, UsageRecord};
use crate::utils::current_timestamp_millis;
use crate::utils::error::{DispatchError, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, error};

#[derive(Clone)]
pub struct RecordHandlerBuilder {
    repo: Arc<dyn UsageLogRepository>,
}

impl RecordHandlerBuilder {
    pub fn new(repo: Arc<dyn UsageLogRepository>) -> Self {
        Self { repo }
    }
}

impl Builder for RecordHandlerBuilder {
    fn next(&self, next: Arc<dyn Handler>) -> Arc<dyn Handler> {
        Arc::new(RecordHandler {
            repo: self.repo.clone(),
            next,
        })
    }
}

pub struct RecordHandler {
    repo: Arc<dyn UsageLogRepository>,
    next: Arc<dyn Handler>,
}

#[async_trait]
impl Handler for RecordHandler {
    fn biz(&self) -> &str {
        self.next.biz()
    }

    async fn handle(&self, ctx: &RequestContext, req: LlmRequest) -> Result<LlmResponse> {
        let (uid, biz, tid) = (req.uid, req.biz.clone(), req.tid.clone());
        let resp = self.next.handle(ctx, req).await?;

        let now = current_timestamp_millis();
        let record = UsageRecord {
            tid,
            uid,
            biz,
            tokens: resp.tokens,
            amount: resp.amount,
            raw_output: resp.answer.clone(),
            ctime: now,
            utime: now,
        };

        let repo = self.repo.clone();
        ctx.defer_until_charged(async move {
            let tid = record.tid.clone();
            match repo.append(record).await {
                Ok(()) => debug!(%tid, "usage record persisted"),
                Err(e) => {
                    let err = DispatchError::recording_failed(e.to_string());
                    error!(%tid, error = %err, "failed to persist usage record");
                }
            }
        });

        Ok(resp)
    }
}

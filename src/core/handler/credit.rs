//! Credit handler
//!
//! Charges the caller once the downstream chain has succeeded. The amount is the one reported
//! by the provider adapter. Work queued by inner handlers runs only after a successful debit
//! and is dropped when the debit fails.

use super::{Builder, Handler};
use crate::core::context::RequestContext;
use crate::core::types::{LlmRequest, LlmResponse};
use crate::services::CreditService;
use crate::storage::{CreditLog, CreditLogRepository, CreditStatus};
use crate::utils::current_timestamp_millis;
use crate::utils::error::{DispatchError, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Clone)]
pub struct CreditHandlerBuilder {
    credit: Arc<dyn CreditService>,
    logs: Arc<dyn CreditLogRepository>,
}

impl CreditHandlerBuilder {
    pub fn new(credit: Arc<dyn CreditService>, logs: Arc<dyn CreditLogRepository>) -> Self {
        Self { credit, logs }
    }
}

impl Builder for CreditHandlerBuilder {
    fn next(&self, next: Arc<dyn Handler>) -> Arc<dyn Handler> {
        Arc::new(CreditHandler {
            credit: self.credit.clone(),
            logs: self.logs.clone(),
            next,
        })
    }
}

pub struct CreditHandler {
    credit: Arc<dyn CreditService>,
    logs: Arc<dyn CreditLogRepository>,
    next: Arc<dyn Handler>,
}

impl CreditHandler {
    async fn save_log(&self, log: &CreditLog) {
        if let Err(e) = self.logs.save(log.clone()).await {
            warn!(tid = %log.tid, status = %log.status, error = %e, "failed to save credit log");
        }
    }
}

#[async_trait]
impl Handler for CreditHandler {
    fn biz(&self) -> &str {
        self.next.biz()
    }

    async fn handle(&self, ctx: &RequestContext, req: LlmRequest) -> Result<LlmResponse> {
        let (uid, biz, tid) = (req.uid, req.biz.clone(), req.tid.clone());

        let balance = ctx.run(self.credit.balance(uid)).await?;
        if balance <= 0 {
            return Err(DispatchError::InsufficientCredit { uid, balance });
        }

        let mut resp = self.next.handle(ctx, req).await?;

        let now = current_timestamp_millis();
        let mut log = CreditLog {
            tid,
            uid,
            biz,
            amount: resp.amount,
            status: CreditStatus::Processing,
            ctime: now,
            utime: now,
        };
        self.save_log(&log).await;

        match ctx.run(self.credit.debit(uid, resp.amount, &log.tid)).await {
            Ok(charged) => {
                if charged != resp.amount {
                    // Replayed tid: the first charge stands
                    debug!(tid = %log.tid, reported = resp.amount, charged, "debit replayed");
                    resp.amount = charged;
                }
                log.amount = charged;
                log.status = CreditStatus::Success;
                log.utime = current_timestamp_millis();
                self.save_log(&log).await;

                let ran = ctx.run_deferred().await;
                info!(uid, tid = %log.tid, amount = charged, deferred = ran, "credit debited");
                Ok(resp)
            }
            Err(err) if err.is_cancellation() => {
                // The debit may or may not have committed; the log stays `processing`
                let dropped = ctx.discard_deferred();
                warn!(uid, tid = %log.tid, dropped, error = %err, "debit interrupted");
                Err(err)
            }
            Err(err) => {
                log.status = CreditStatus::Failed;
                log.utime = current_timestamp_millis();
                self.save_log(&log).await;

                let dropped = ctx.discard_deferred();
                debug!(dropped, "discarded work queued for the failed charge");
                warn!(uid, tid = %log.tid, amount = resp.amount, error = %err, "debit failed");
                Err(DispatchError::credit_debit_failed(err.to_string()))
            }
        }
    }
}

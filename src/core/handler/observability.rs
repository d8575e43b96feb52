//! Observability handler
//!
//! Outermost layer of every chain: times the call, logs the outcome and feeds the metrics
//! collector. It sees the final result of the chain, including credit failures.

use super::{Builder, Handler};
use crate::core::context::RequestContext;
use crate::core::observability::{CallOutcome, MetricsCollector};
use crate::core::types::{LlmRequest, LlmResponse};
use crate::utils::error::Result;
use async_trait::async_trait;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use tracing::{Instrument, debug, error, info_span, warn};

#[derive(Debug, Clone)]
pub struct ObservabilityHandlerBuilder {
    metrics: MetricsCollector,
}

impl ObservabilityHandlerBuilder {
    pub fn new(metrics: MetricsCollector) -> Self {
        Self { metrics }
    }
}

impl Builder for ObservabilityHandlerBuilder {
    fn next(&self, next: Arc<dyn Handler>) -> Arc<dyn Handler> {
        Arc::new(ObservabilityHandler {
            metrics: self.metrics.clone(),
            next,
        })
    }
}

pub struct ObservabilityHandler {
    metrics: MetricsCollector,
    next: Arc<dyn Handler>,
}

#[async_trait]
impl Handler for ObservabilityHandler {
    fn biz(&self) -> &str {
        self.next.biz()
    }

    async fn handle(&self, ctx: &RequestContext, req: LlmRequest) -> Result<LlmResponse> {
        let span = info_span!(
            "llm_request",
            biz = %req.biz,
            uid = req.uid,
            tid = %req.tid,
            request_id = %ctx.request_id()
        );
        let biz = req.biz.clone();
        let start = Instant::now();

        let result = AssertUnwindSafe(self.next.handle(ctx, req).instrument(span.clone()))
            .catch_unwind()
            .await;
        let elapsed = start.elapsed();
        let elapsed_ms = elapsed.as_millis() as u64;

        match result {
            Ok(Ok(resp)) => {
                self.metrics
                    .record_request(
                        &biz,
                        elapsed,
                        CallOutcome::Success {
                            tokens: resp.tokens,
                            amount: resp.amount,
                        },
                    )
                    .await;
                span.in_scope(|| {
                    debug!(
                        elapsed_ms,
                        tokens = resp.tokens,
                        amount = resp.amount,
                        trace_id = %resp.trace_id,
                        "llm request succeeded"
                    )
                });
                Ok(resp)
            }
            Ok(Err(err)) => {
                self.metrics
                    .record_request(&biz, elapsed, CallOutcome::Error(err.error_code()))
                    .await;
                span.in_scope(|| {
                    warn!(elapsed_ms, code = err.error_code(), error = %err, "llm request failed")
                });
                Err(err)
            }
            Err(panic) => {
                self.metrics
                    .record_request(&biz, elapsed, CallOutcome::Panic)
                    .await;
                span.in_scope(|| error!(elapsed_ms, "llm request panicked"));
                std::panic::resume_unwind(panic)
            }
        }
    }
}

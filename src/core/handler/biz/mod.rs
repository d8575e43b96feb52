//! Business chains
//!
//! A [`CompositionHandler`] assembles the chain of one business key once, at startup. The
//! [`FacadeHandler`] routes each request to the chain registered for its key.

pub mod examine;

pub use examine::{QuestionExamineBizHandler, QuestionExamineBizHandlerBuilder};

use super::{Builder, Handler, assemble};
use crate::core::context::RequestContext;
use crate::core::types::{LlmRequest, LlmResponse};
use crate::utils::error::{DispatchError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Fixed chain of builders around a terminal handler, serving one business key
pub struct CompositionHandler {
    biz: String,
    chain: Arc<dyn Handler>,
}

impl CompositionHandler {
    /// `builders[0]` runs first; `terminal` runs last
    pub fn new(
        biz: impl Into<String>,
        builders: &[Arc<dyn Builder>],
        terminal: Arc<dyn Handler>,
    ) -> Self {
        Self {
            biz: biz.into(),
            chain: assemble(builders, terminal),
        }
    }
}

#[async_trait]
impl Handler for CompositionHandler {
    fn biz(&self) -> &str {
        &self.biz
    }

    async fn handle(&self, ctx: &RequestContext, req: LlmRequest) -> Result<LlmResponse> {
        match self.chain.handle(ctx, req).await {
            Ok(resp) => {
                // Chains without a credit handler still persist what their record handler queued
                let ran = ctx.run_deferred().await;
                if ran > 0 {
                    debug!(biz = %self.biz, ran, "ran deferred work");
                }
                Ok(resp)
            }
            Err(err) => {
                ctx.discard_deferred();
                Err(err)
            }
        }
    }
}

/// Routes requests by business key
pub struct FacadeHandler {
    handlers: HashMap<String, Arc<dyn Handler>>,
}

impl FacadeHandler {
    /// Register each handler under the key it reports from [`Handler::biz`]
    pub fn new(handlers: impl IntoIterator<Item = Arc<dyn Handler>>) -> Self {
        Self {
            handlers: handlers
                .into_iter()
                .map(|h| (h.biz().to_string(), h))
                .collect(),
        }
    }

    /// Registered business keys, sorted
    pub fn business_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

#[async_trait]
impl Handler for FacadeHandler {
    fn biz(&self) -> &str {
        "facade"
    }

    async fn handle(&self, ctx: &RequestContext, req: LlmRequest) -> Result<LlmResponse> {
        let handler = self
            .handlers
            .get(&req.biz)
            .ok_or_else(|| DispatchError::unknown_business_key(req.biz.clone()))?;
        handler.handle(ctx, req).await
    }
}

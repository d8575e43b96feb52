//! Configuration handler
//!
//! Loads the business configuration and injects it into the request. Fails closed: without a
//! configuration the request never reaches the provider.

use super::{Builder, Handler};
use crate::core::context::RequestContext;
use crate::core::types::{LlmRequest, LlmResponse};
use crate::storage::ConfigRepository;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

#[derive(Clone)]
pub struct ConfigHandlerBuilder {
    repo: Arc<dyn ConfigRepository>,
}

impl ConfigHandlerBuilder {
    pub fn new(repo: Arc<dyn ConfigRepository>) -> Self {
        Self { repo }
    }
}

impl Builder for ConfigHandlerBuilder {
    fn next(&self, next: Arc<dyn Handler>) -> Arc<dyn Handler> {
        Arc::new(ConfigHandler {
            repo: self.repo.clone(),
            next,
        })
    }
}

pub struct ConfigHandler {
    repo: Arc<dyn ConfigRepository>,
    next: Arc<dyn Handler>,
}

#[async_trait]
impl Handler for ConfigHandler {
    fn biz(&self) -> &str {
        self.next.biz()
    }

    async fn handle(&self, ctx: &RequestContext, req: LlmRequest) -> Result<LlmResponse> {
        let config = ctx.run(self.repo.get_config(&req.biz)).await?;
        debug!(biz = %req.biz, model = %config.model, price = ?config.price, "config loaded");
        self.next.handle(ctx, req.with_config(config)).await
    }
}

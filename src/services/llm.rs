//! Facade entry point

use crate::core::context::RequestContext;
use crate::core::handler::Handler;
use crate::core::types::{LlmRequest, LlmResponse};
use crate::utils::error::Result;
use std::sync::Arc;

/// Single entry point for business requests. Routes through the facade.
#[derive(Clone)]
pub struct LlmService {
    facade: Arc<dyn Handler>,
}

impl LlmService {
    pub fn new(facade: Arc<dyn Handler>) -> Self {
        Self { facade }
    }

    pub async fn invoke(&self, ctx: &RequestContext, req: LlmRequest) -> Result<LlmResponse> {
        self.facade.handle(ctx, req).await
    }
}

impl std::fmt::Debug for LlmService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmService").finish_non_exhaustive()
    }
}

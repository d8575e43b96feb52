//! Handler chain primitives
//!
//! A [`Handler`] serves one request. A [`Builder`] wraps a downstream handler into a new one
//! that does its own work around the delegation. Builders only capture shared collaborators, so
//! a chain built once can serve any number of concurrent requests.
//!
//! Chain order for a business key:
//!
//! ```text
//! observability -> config -> credit -> record -> business -> provider
//! ```

pub mod biz;
pub mod config;
pub mod credit;
pub mod observability;
pub mod record;

pub use config::{ConfigHandler, ConfigHandlerBuilder};
pub use credit::{CreditHandler, CreditHandlerBuilder};
pub use observability::{ObservabilityHandler, ObservabilityHandlerBuilder};
pub use record::{RecordHandler, RecordHandlerBuilder};

use crate::core::context::RequestContext;
use crate::core::types::{LlmRequest, LlmResponse};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Serves requests for one business key
#[async_trait]
pub trait Handler: Send + Sync {
    /// Business key this handler serves
    fn biz(&self) -> &str;

    async fn handle(&self, ctx: &RequestContext, req: LlmRequest) -> Result<LlmResponse>;
}

/// Wraps a downstream handler.
///
/// The returned handler performs the builder's work and, on success, delegates to `next`. On
/// failure it returns the error without calling `next`.
pub trait Builder: Send + Sync {
    fn next(&self, next: Arc<dyn Handler>) -> Arc<dyn Handler>;
}

/// Fold `builders` right to left around `terminal`, so that `builders[0]` runs first.
pub fn assemble(builders: &[Arc<dyn Builder>], terminal: Arc<dyn Handler>) -> Arc<dyn Handler> {
    builders
        .iter()
        .rev()
        .fold(terminal, |next, builder| builder.next(next))
}

//! # llm-dispatch
//!
//! Chain-of-responsibility dispatch for billed LLM business requests.
//!
//! A request enters through the [`FacadeHandler`], which routes it by business key to a
//! pre-assembled chain:
//!
//! ```text
//! observability -> config -> credit -> record -> business -> provider
//! ```
//!
//! Every cross-cutting concern is a [`Builder`] that wraps the next [`Handler`]. Chains are built
//! once at startup and shared by all requests.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use llm_dispatch::{AiModule, Config, RequestContext};
//! use llm_dispatch::core::examine::{ExamineInput, ReferenceAnswer};
//! use llm_dispatch::services::InMemoryCreditLedger;
//! use llm_dispatch::storage::Storage;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config/dispatch.yaml").await?;
//!     let storage = Storage::connect(&config).await?;
//!     let ledger = Arc::new(InMemoryCreditLedger::new());
//!     ledger.grant(42, 10_000);
//!
//!     let module = AiModule::init(&config, storage, ledger)?;
//!     let input = ExamineInput::new(
//!         "What is ownership?",
//!         "Each value has a single owner...",
//!         ReferenceAnswer::default(),
//!     );
//!     let result = module
//!         .examine
//!         .examine(&RequestContext::new(), 42, "tid-1", input)
//!         .await?;
//!     println!("{:?}", result.tier);
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod core;
pub mod module;
pub mod services;
pub mod storage;
pub mod utils;

pub use config::Config;
pub use module::AiModule;
pub use utils::error::{DispatchError, Result};

pub use core::context::RequestContext;
pub use core::handler::biz::{CompositionHandler, FacadeHandler};
pub use core::handler::{Builder, Handler};
pub use core::providers::ProviderError;
pub use core::types::{BizConfig, BizOutcome, LlmRequest, LlmResponse, RequestInput};

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Build information emitted by `build.rs`
#[derive(Debug, Clone)]
pub struct BuildInfo {
    /// Version number
    pub version: &'static str,
    /// Build timestamp (seconds since the epoch)
    pub build_time: &'static str,
    /// Git commit hash
    pub git_hash: &'static str,
    /// Rust version
    pub rust_version: &'static str,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            version: VERSION,
            build_time: env!("BUILD_TIME"),
            git_hash: env!("GIT_HASH"),
            rust_version: env!("RUST_VERSION"),
        }
    }
}

/// Build information for this binary
pub fn build_info() -> BuildInfo {
    BuildInfo::default()
}

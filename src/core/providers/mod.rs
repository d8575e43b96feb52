//! Model backend adapters
//!
//! An adapter is the terminal [`Handler`](crate::core::handler::Handler) of a business chain.

pub mod unified_provider;
pub mod zhipu;

pub use unified_provider::ProviderError;
pub use zhipu::{ZhipuConfig, ZhipuProvider};

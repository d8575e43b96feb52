//! Zhipu Provider
//!
//! OpenAI-compatible chat completions backend. Terminal handler of every business chain.

pub mod client;
pub mod config;
pub mod provider;

pub use client::ZhipuClient;
pub use config::ZhipuConfig;
pub use provider::ZhipuProvider;

/// Provider name used in errors and logs
pub const PROVIDER_NAME: &str = "zhipu";

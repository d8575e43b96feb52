//! Common test utilities for llm-dispatch
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::common::{fixtures, mocks::ScriptedProvider};
//!
//! #[tokio::test]
//! async fn my_test() {
//!     let provider = ScriptedProvider::new("25K", 120);
//!     let config = fixtures::examine_config(2);
//!     // ...
//! }
//! ```

pub mod fixtures;
pub mod mocks;

pub use database::TestDatabase;

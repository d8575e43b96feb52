//! Error handling utilities
//!
//! This module defines the crate error type shared by every handler in the dispatch chain.

pub mod error;

pub use error::*;

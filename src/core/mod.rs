//! Core dispatch machinery
//!
//! Request types, the handler chain, the examine domain, billing arithmetic and the model
//! backend adapters.

pub mod context;
pub mod cost;
pub mod examine;
pub mod handler;
pub mod observability;
pub mod providers;
pub mod types;

//! Configuration validation
//!
//! Validators return a plain message; [`crate::config::Config::validate`] wraps it with the
//! section name.

mod config_validators;
mod storage_validators;
mod trait_def;


pub use config_validators::validate_businesses;
pub use trait_def::Validate;

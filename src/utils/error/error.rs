//! Error handling for the dispatch pipeline
//!
//! This module defines all error types surfaced by the handler chain.

#![allow(missing_docs)]

use crate::core::providers::unified_provider::ProviderError;
use thiserror::Error;

/// Result type alias for the dispatch pipeline
pub type Result<T> = std::result::Result<T, DispatchError>;

/// Main error type for the dispatch pipeline
#[derive(Error, Debug)]
pub enum DispatchError {
    /// No business configuration exists for the business key
    #[error("No configuration found for business '{0}'")]
    ConfigNotFound(String),

    /// No chain is registered for the business key
    #[error("Unknown business key '{0}'")]
    UnknownBusinessKey(String),

    /// Provider errors
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The ledger refused or failed the debit
    #[error("Credit debit failed: {0}")]
    CreditDebitFailed(String),

    /// The caller has no credit left
    #[error("Insufficient credit for user {uid}: balance {balance}")]
    InsufficientCredit { uid: i64, balance: i64 },

    /// Usage record could not be persisted
    #[error("Recording failed: {0}")]
    RecordingFailed(String),

    /// The caller cancelled the request
    #[error("Request cancelled")]
    Canceled,

    /// The caller's deadline passed
    #[error("Request deadline exceeded")]
    DeadlineExceeded,

    /// The request payload does not fit the business
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Database errors
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Helper functions for creating specific errors
impl DispatchError {
    pub fn config_not_found<S: Into<String>>(biz: S) -> Self {
        Self::ConfigNotFound(biz.into())
    }

    pub fn unknown_business_key<S: Into<String>>(biz: S) -> Self {
        Self::UnknownBusinessKey(biz.into())
    }

    pub fn credit_debit_failed<S: Into<String>>(message: S) -> Self {
        Self::CreditDebitFailed(message.into())
    }

    pub fn recording_failed<S: Into<String>>(message: S) -> Self {
        Self::RecordingFailed(message.into())
    }

    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Stable machine-readable code for the error
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ConfigNotFound(_) => "CONFIG_NOT_FOUND",
            Self::UnknownBusinessKey(_) => "UNKNOWN_BUSINESS_KEY",
            Self::Provider(_) => "PROVIDER_ERROR",
            Self::CreditDebitFailed(_) => "CREDIT_DEBIT_FAILED",
            Self::InsufficientCredit { .. } => "INSUFFICIENT_CREDIT",
            Self::RecordingFailed(_) => "RECORDING_FAILED",
            Self::Canceled => "CANCELED",
            Self::DeadlineExceeded => "DEADLINE_EXCEEDED",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
            Self::Yaml(_) => "YAML_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether an outer caller may reasonably retry the same request.
    ///
    /// The pipeline itself never retries. Retrying with the same correlation id is safe: debits
    /// and usage records are deduplicated by it.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Provider(err) => err.is_retryable(),
            Self::CreditDebitFailed(_) | Self::Database(_) | Self::DeadlineExceeded => true,
            _ => false,
        }
    }

    /// Whether the error was caused by the caller's cancellation or deadline
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Canceled | Self::DeadlineExceeded)
    }
}

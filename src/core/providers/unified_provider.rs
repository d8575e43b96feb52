//! Unified Provider Error Handling
//!
//! Single error type for every model backend adapter.
//!
//! | Variant | Purpose | HTTP Status | Retryable |
//! |------|------|------------|--------|
//! | Authentication | Authentication failed | 401 | No |
//! | RateLimit | Rate limit exceeded | 429 | Yes (after delay) |
//! | InvalidRequest | Invalid request | 400 | No |
//! | Network | Transport failure | 503 | Yes |
//! | Timeout | Backend did not answer in time | 503 | Yes |
//! | ApiError | Non-2xx answer | status | 429 and 5xx |
//! | ResponseParsing | Malformed backend answer | 502 | No |
//! | Configuration | Adapter misconfigured | 400 | No |
//! | CostOverflow | Billing arithmetic overflowed | 500 | No |
//!
//! ## Usage
//!
//! ```rust,ignore
//! use llm_dispatch::ProviderError;
//!
//! let err = ProviderError::api_error("zhipu", 502, "bad gateway");
//! assert!(err.is_retryable());
//! ```

#[derive(Debug, Clone, thiserror::Error)]
pub enum ProviderError {
    #[error("Authentication failed for {provider}: {message}")]
    Authentication {
        provider: &'static str,
        message: String,
    },

    #[error("Rate limit exceeded for {provider}: {message}")]
    RateLimit {
        provider: &'static str,
        message: String,
        retry_after: Option<u64>,
    },

    #[error("Invalid request for {provider}: {message}")]
    InvalidRequest {
        provider: &'static str,
        message: String,
    },

    #[error("Network error for {provider}: {message}")]
    Network {
        provider: &'static str,
        message: String,
    },

    #[error("Timeout for {provider}: {message}")]
    Timeout {
        provider: &'static str,
        message: String,
    },

    #[error("API error for {provider} (status {status}): {message}")]
    ApiError {
        provider: &'static str,
        status: u16,
        message: String,
    },

    #[error("Failed to parse {provider} response: {message}")]
    ResponseParsing {
        provider: &'static str,
        message: String,
    },

    #[error("Configuration error for {provider}: {message}")]
    Configuration {
        provider: &'static str,
        message: String,
    },

    #[error("Cost overflow for {provider}: {tokens} tokens at {price} per token")]
    CostOverflow {
        provider: &'static str,
        tokens: i64,
        price: i64,
    },
}

impl ProviderError {
    /// Create authentication error
    pub fn authentication(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Authentication {
            provider,
            message: message.into(),
        }
    }

    /// Create rate limit error
    pub fn rate_limit(provider: &'static str, retry_after: Option<u64>) -> Self {
        Self::RateLimit {
            provider,
            message: match retry_after {
                Some(seconds) => format!("Rate limit exceeded. Retry after {} seconds", seconds),
                None => "Rate limit exceeded".to_string(),
            },
            retry_after,
        }
    }

    /// Create invalid request error
    pub fn invalid_request(provider: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            provider,
            message: message.into(),
        }
    }

    /// Create network error
    pub fn network(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Network {
            provider,
            message: message.into(),
        }
    }

    /// Create timeout error
    pub fn timeout(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Timeout {
            provider,
            message: message.into(),
        }
    }

    /// Create API error with status code
    pub fn api_error(provider: &'static str, status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            provider,
            status,
            message: message.into(),
        }
    }

    /// Create response parsing error
    pub fn response_parsing(provider: &'static str, message: impl Into<String>) -> Self {
        Self::ResponseParsing {
            provider,
            message: message.into(),
        }
    }

    /// Create configuration error
    pub fn configuration(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Configuration {
            provider,
            message: message.into(),
        }
    }

    /// Classify a transport failure raised by reqwest
    pub fn from_reqwest(provider: &'static str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::timeout(provider, err.to_string())
        } else if err.is_decode() {
            Self::response_parsing(provider, err.to_string())
        } else {
            Self::network(provider, err.to_string())
        }
    }

    /// Map a non-2xx status to the most specific variant
    pub fn from_status(provider: &'static str, status: u16, body: impl Into<String>) -> Self {
        match status {
            401 | 403 => Self::authentication(provider, body),
            429 => Self::RateLimit {
                provider,
                message: body.into(),
                retry_after: None,
            },
            _ => Self::api_error(provider, status, body),
        }
    }

    /// Get the provider name that caused this error
    pub fn provider(&self) -> &'static str {
        match self {
            Self::Authentication { provider, .. }
            | Self::RateLimit { provider, .. }
            | Self::InvalidRequest { provider, .. }
            | Self::Network { provider, .. }
            | Self::Timeout { provider, .. }
            | Self::ApiError { provider, .. }
            | Self::ResponseParsing { provider, .. }
            | Self::Configuration { provider, .. }
            | Self::CostOverflow { provider, .. } => provider,
        }
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network { .. } | Self::Timeout { .. } | Self::RateLimit { .. } => true,

            // API errors depend on status code
            Self::ApiError { status, .. } => matches!(*status, 429 | 500..=599),

            Self::Authentication { .. }
            | Self::InvalidRequest { .. }
            | Self::ResponseParsing { .. }
            | Self::Configuration { .. }
            | Self::CostOverflow { .. } => false,
        }
    }

    /// Get retry delay in seconds
    pub fn retry_delay(&self) -> Option<u64> {
        match self {
            Self::RateLimit { retry_after, .. } => retry_after.or(Some(60)),
            Self::Network { .. } | Self::Timeout { .. } => Some(1),
            Self::ApiError { status, .. } => match *status {
                429 => Some(60),
                500..=599 => Some(3),
                _ => None,
            },
            _ => None,
        }
    }

    /// Get HTTP status code for this error
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Authentication { .. } => 401,
            Self::RateLimit { .. } => 429,
            Self::InvalidRequest { .. } | Self::Configuration { .. } => 400,
            Self::Network { .. } | Self::Timeout { .. } => 503,
            Self::ApiError { status, .. } => *status,
            Self::ResponseParsing { .. } => 502,
            Self::CostOverflow { .. } => 500,
        }
    }
}

/// Transport failure outside of a named adapter
impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        Self::from_reqwest("http", err)
    }
}

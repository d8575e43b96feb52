//! Cost calculation types

use serde::{Deserialize, Serialize};

/// Token usage reported by a backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageTokens {
    /// Input/prompt tokens
    #[serde(default)]
    pub prompt_tokens: i64,
    /// Output/completion tokens
    #[serde(default)]
    pub completion_tokens: i64,
    /// Total tokens as reported by the backend
    #[serde(default)]
    pub total_tokens: i64,
}

impl UsageTokens {
    pub fn new(prompt_tokens: i64, completion_tokens: i64) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }

    /// Usage known only as a total
    pub fn total(total_tokens: i64) -> Self {
        Self {
            prompt_tokens: 0,
            completion_tokens: 0,
            total_tokens,
        }
    }

    /// Tokens the caller pays for: the reported total, or the sum of parts when the backend
    /// omits the total. Never negative.
    pub fn billable_tokens(&self) -> i64 {
        let tokens = if self.total_tokens > 0 {
            self.total_tokens
        } else {
            self.prompt_tokens.saturating_add(self.completion_tokens)
        };
        tokens.max(0)
    }
}

/// Result of pricing one call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub tokens: i64,
    pub price_per_token: i64,
    /// `tokens * price_per_token`
    pub amount: i64,
}

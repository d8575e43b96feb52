//! Billing arithmetic
//!
//! Amounts are integers in the smallest currency unit. Prices are integers per token, so the
//! charge for a call is an exact product with no floating point rounding.

pub mod types;

pub use types::{CostBreakdown, UsageTokens};

use crate::core::providers::unified_provider::ProviderError;

/// Charge for `usage` at `price_per_token`.
///
/// Fails with [`ProviderError::CostOverflow`] when the product does not fit in an `i64`, and
/// with a configuration error for a negative price.
pub fn calculate_cost(
    provider: &'static str,
    usage: &UsageTokens,
    price_per_token: i64,
) -> Result<CostBreakdown, ProviderError> {
    if price_per_token < 0 {
        return Err(ProviderError::configuration(
            provider,
            format!("price per token must not be negative, got {}", price_per_token),
        ));
    }

    let tokens = usage.billable_tokens();
    let amount = tokens
        .checked_mul(price_per_token)
        .ok_or(ProviderError::CostOverflow {
            provider,
            tokens,
            price: price_per_token,
        })?;

    Ok(CostBreakdown {
        tokens,
        price_per_token,
        amount,
    })
}

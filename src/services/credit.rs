//! Credit collaborator
//!
//! The ledger owns balances. Debits are keyed by correlation id: replaying a debit with an id
//! that was already applied succeeds without charging again.

use crate::utils::error::{DispatchError, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Credit ledger consumed by the credit handler
#[async_trait]
pub trait CreditService: Send + Sync {
    /// Current balance of `uid`; unknown users have a zero balance
    async fn balance(&self, uid: i64) -> Result<i64>;

    /// Deduct `amount` from `uid`, at most once per `tid`.
    ///
    /// Returns the amount charged under `tid`. A replay returns the amount of the first debit.
    async fn debit(&self, uid: i64, amount: i64, tid: &str) -> Result<i64>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct AppliedDebit {
    uid: i64,
    amount: i64,
}

#[derive(Debug, Default)]
struct LedgerState {
    balances: HashMap<i64, i64>,
    debits: HashMap<String, AppliedDebit>,
}

/// In-process ledger. Balance checks and debits happen under one lock, so concurrent debits
/// for the same user cannot overdraw.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCreditLedger {
    state: Arc<Mutex<LedgerState>>,
}

impl InMemoryCreditLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` to the balance of `uid`
    pub fn grant(&self, uid: i64, amount: i64) {
        let mut state = self.state.lock();
        *state.balances.entry(uid).or_insert(0) += amount;
        info!(uid, amount, "credit granted");
    }

    pub fn balance_of(&self, uid: i64) -> i64 {
        self.state.lock().balances.get(&uid).copied().unwrap_or(0)
    }

    /// Number of distinct debits applied
    pub fn debit_count(&self) -> usize {
        self.state.lock().debits.len()
    }

    /// Amount charged under `tid`, if a debit was applied
    pub fn debited(&self, tid: &str) -> Option<i64> {
        self.state.lock().debits.get(tid).map(|d| d.amount)
    }
}

#[async_trait]
impl CreditService for InMemoryCreditLedger {
    async fn balance(&self, uid: i64) -> Result<i64> {
        Ok(self.balance_of(uid))
    }

    async fn debit(&self, uid: i64, amount: i64, tid: &str) -> Result<i64> {
        if amount < 0 {
            return Err(DispatchError::invalid_input(format!(
                "debit amount must not be negative, got {}",
                amount
            )));
        }

        let mut state = self.state.lock();
        if let Some(applied) = state.debits.get(tid) {
            if applied.uid != uid {
                return Err(DispatchError::credit_debit_failed(format!(
                    "correlation id {} already used by another user",
                    tid
                )));
            }
            debug!(uid, tid, charged = applied.amount, "debit already applied");
            return Ok(applied.amount);
        }

        let balance = state.balances.get(&uid).copied().unwrap_or(0);
        if balance < amount {
            return Err(DispatchError::InsufficientCredit { uid, balance });
        }

        state.balances.insert(uid, balance - amount);
        state
            .debits
            .insert(tid.to_string(), AppliedDebit { uid, amount });
        debug!(uid, tid, amount, remaining = balance - amount, "debit applied");
        Ok(amount)
    }
}

//! Counting fakes for the collaborators of a dispatch chain

use async_trait::async_trait;
use llm_dispatch::core::handler::Handler;
use llm_dispatch::services::{CreditService, InMemoryCreditLedger};
use llm_dispatch::storage::{InMemoryUsageLog, UsageLogRepository, UsageRecord};
use llm_dispatch::{DispatchError, LlmRequest, LlmResponse, ProviderError, RequestContext, Result};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

/// Terminal handler answering with a fixed text and token count, priced from the injected
/// business configuration
pub struct ScriptedProvider {
    answer: String,
    tokens: i64,
    delay: Option<Duration>,
    failure: Option<ProviderError>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub fn new(answer: &str, tokens: i64) -> Arc<Self> {
        Arc::new(Self::script(answer, tokens))
    }

    /// Sleeps for `delay` before answering
    pub fn slow(answer: &str, tokens: i64, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            delay: Some(delay),
            ..Self::script(answer, tokens)
        })
    }

    pub fn failing(err: ProviderError) -> Arc<Self> {
        Arc::new(Self {
            failure: Some(err),
            ..Self::script("", 0)
        })
    }

    fn script(answer: &str, tokens: i64) -> Self {
        Self {
            answer: answer.to_string(),
            tokens,
            delay: None,
            failure: None,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().last().cloned()
    }
}

#[async_trait]
impl Handler for ScriptedProvider {
    fn biz(&self) -> &str {
        "scripted"
    }

    async fn handle(&self, ctx: &RequestContext, req: LlmRequest) -> Result<LlmResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(prompt) = &req.prompt {
            self.prompts.lock().push(prompt.clone());
        }

        if let Some(delay) = self.delay {
            ctx.run(async {
                tokio::time::sleep(delay).await;
                Ok(())
            })
            .await?;
        }
        if let Some(err) = &self.failure {
            return Err(DispatchError::Provider(err.clone()));
        }

        let price = req.config()?.price.unwrap_or(0);
        Ok(LlmResponse {
            answer: self.answer.clone(),
            tokens: self.tokens,
            amount: self.tokens * price,
            trace_id: format!("trace-{}", req.tid),
            outcome: None,
        })
    }
}

/// Ledger that counts calls and can be told to reject debits
#[derive(Default)]
pub struct CountingCredit {
    pub ledger: InMemoryCreditLedger,
    balance_calls: AtomicUsize,
    debit_calls: AtomicUsize,
    reject_debits: AtomicBool,
}

impl CountingCredit {
    pub fn with_balance(uid: i64, amount: i64) -> Arc<Self> {
        let credit = Self::default();
        credit.ledger.grant(uid, amount);
        Arc::new(credit)
    }

    pub fn reject_debits(&self) {
        self.reject_debits.store(true, Ordering::SeqCst);
    }

    pub fn balance_calls(&self) -> usize {
        self.balance_calls.load(Ordering::SeqCst)
    }

    pub fn debit_calls(&self) -> usize {
        self.debit_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CreditService for CountingCredit {
    async fn balance(&self, uid: i64) -> Result<i64> {
        self.balance_calls.fetch_add(1, Ordering::SeqCst);
        self.ledger.balance(uid).await
    }

    async fn debit(&self, uid: i64, amount: i64, tid: &str) -> Result<i64> {
        self.debit_calls.fetch_add(1, Ordering::SeqCst);
        if self.reject_debits.load(Ordering::SeqCst) {
            return Err(DispatchError::credit_debit_failed("ledger unavailable"));
        }
        self.ledger.debit(uid, amount, tid).await
    }
}

/// Usage log that counts append attempts
#[derive(Default)]
pub struct CountingUsageLog {
    pub inner: InMemoryUsageLog,
    appends: AtomicUsize,
}

impl CountingUsageLog {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn appends(&self) -> usize {
        self.appends.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UsageLogRepository for CountingUsageLog {
    async fn append(&self, record: UsageRecord) -> Result<()> {
        self.appends.fetch_add(1, Ordering::SeqCst);
        self.inner.append(record).await
    }
}

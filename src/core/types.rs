//! Request and response types flowing through the handler chain

use crate::core::examine::{ExamineInput, ExamineTier};
use crate::utils::error::{DispatchError, Result};
use serde::{Deserialize, Serialize};

/// Business-defined payload of a request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum RequestInput {
    /// Free-form prompt text, rendered into the business prompt template as `{input}`
    Text(String),
    /// A candidate answer to be examined against a tiered reference answer
    Examine(ExamineInput),
}

/// Runtime parameters of one business, loaded by the configuration handler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BizConfig {
    /// Business key this configuration belongs to
    pub biz: String,
    /// Model name sent to the backend
    pub model: String,
    /// Price per token in the smallest currency unit; overrides the adapter default
    #[serde(default)]
    pub price: Option<i64>,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_top_p")]
    pub top_p: f32,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    /// System message sent ahead of the rendered prompt
    #[serde(default)]
    pub system_prompt: String,
    /// Prompt template with `{placeholder}` slots filled by the business handler
    pub prompt_template: String,
}

fn default_temperature() -> f32 {
    0.95
}

fn default_top_p() -> f32 {
    0.7
}

/// One business request. Handlers take it by value and hand it on, so it is never shared.
#[derive(Debug, Clone)]
pub struct LlmRequest {
    /// Business key
    pub biz: String,
    /// Caller identity
    pub uid: i64,
    /// Correlation id, used as idempotency key for debits and usage records
    pub tid: String,
    pub input: RequestInput,
    /// Injected by the configuration handler
    pub config: Option<BizConfig>,
    /// Rendered by the business handler
    pub prompt: Option<String>,
}

impl LlmRequest {
    pub fn new(
        biz: impl Into<String>,
        uid: i64,
        tid: impl Into<String>,
        input: RequestInput,
    ) -> Self {
        Self {
            biz: biz.into(),
            uid,
            tid: tid.into(),
            input,
            config: None,
            prompt: None,
        }
    }

    pub fn with_config(mut self, config: BizConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    /// The injected business configuration; a missing one means the chain was misassembled
    pub fn config(&self) -> Result<&BizConfig> {
        self.config
            .as_ref()
            .ok_or_else(|| DispatchError::config_not_found(self.biz.clone()))
    }
}

/// Structured outcome attached by a business handler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum BizOutcome {
    Examine(ExamineTier),
}

/// Result of one request. `tokens` and `amount` are set by the provider adapter only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LlmResponse {
    /// Raw text generated by the backend
    pub answer: String,
    pub tokens: i64,
    /// Charge in the smallest currency unit
    pub amount: i64,
    /// Provider-side trace id
    pub trace_id: String,
    pub outcome: Option<BizOutcome>,
}

impl LlmResponse {
    pub fn with_outcome(mut self, outcome: BizOutcome) -> Self {
        self.outcome = Some(outcome);
        self
    }

    pub fn examine_tier(&self) -> Option<ExamineTier> {
        match self.outcome {
            Some(BizOutcome::Examine(tier)) => Some(tier),
            None => None,
        }
    }
}

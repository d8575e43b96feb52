//! Zhipu Client
//!
//! Request transformation and response processing

use serde::{Deserialize, Serialize};

use super::{PROVIDER_NAME, ZhipuConfig};
use crate::core::cost::UsageTokens;
use crate::core::providers::unified_provider::ProviderError;
use crate::core::types::{LlmRequest, RequestInput};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Body of `POST /chat/completions`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub top_p: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<UsageTokens>,
}

#[derive(Debug, Clone, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Clone, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// A parsed successful completion
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub id: Option<String>,
    pub content: String,
    pub usage: UsageTokens,
}

/// Zhipu API client logic
pub struct ZhipuClient;

impl ZhipuClient {
    /// Build the request body. Business configuration overrides the adapter defaults.
    pub fn transform_chat_request(
        config: &ZhipuConfig,
        req: &LlmRequest,
    ) -> Result<ChatCompletionRequest, ProviderError> {
        let user_content = Self::user_content(req)?;
        let biz = req.config.as_ref();

        let mut messages = Vec::with_capacity(2);
        if let Some(system) = biz.map(|c| c.system_prompt.as_str()).filter(|s| !s.is_empty()) {
            messages.push(ChatMessage {
                role: "system".to_string(),
                content: system.to_string(),
            });
        }
        messages.push(ChatMessage {
            role: "user".to_string(),
            content: user_content,
        });

        Ok(ChatCompletionRequest {
            model: biz
                .map(|c| c.model.clone())
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| config.model.clone()),
            messages,
            temperature: biz.map(|c| c.temperature).unwrap_or(0.95),
            top_p: biz.map(|c| c.top_p).unwrap_or(0.7),
            max_tokens: biz.and_then(|c| c.max_tokens),
        })
    }

    /// Rendered prompt, or the text input rendered into the business template as `{input}`
    fn user_content(req: &LlmRequest) -> Result<String, ProviderError> {
        if let Some(prompt) = &req.prompt {
            return Ok(prompt.clone());
        }
        match &req.input {
            RequestInput::Text(text) => Ok(match &req.config {
                Some(config) => config.prompt_template.replace("{input}", text),
                None => text.clone(),
            }),
            RequestInput::Examine(_) => Err(ProviderError::invalid_request(
                PROVIDER_NAME,
                "structured input must be rendered into a prompt first",
            )),
        }
    }

    /// Parse a 2xx body
    pub fn transform_chat_response(body: &[u8]) -> Result<Completion, ProviderError> {
        let response: ChatCompletionResponse = serde_json::from_slice(body)
            .map_err(|e| ProviderError::response_parsing(PROVIDER_NAME, e.to_string()))?;

        let content = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::response_parsing(PROVIDER_NAME, "no choices returned"))?
            .message
            .content
            .unwrap_or_default();

        Ok(Completion {
            id: response.id.filter(|id| !id.is_empty()),
            content,
            usage: response.usage.unwrap_or_default(),
        })
    }

    /// Map a non-2xx answer to the most specific error
    pub fn transform_error(status: u16, body: &[u8], retry_after: Option<u64>) -> ProviderError {
        let message = serde_json::from_slice::<ErrorBody>(body)
            .ok()
            .map(|b| match (b.error.code, b.error.message) {
                (Some(code), Some(message)) => format!("{}: {}", code, message),
                (None, Some(message)) => message,
                (Some(code), None) => code,
                (None, None) => format!("HTTP {}", status),
            })
            .unwrap_or_else(|| String::from_utf8_lossy(body).into_owned());

        match status {
            429 => ProviderError::RateLimit {
                provider: PROVIDER_NAME,
                message,
                retry_after,
            },
            _ => ProviderError::from_status(PROVIDER_NAME, status, message),
        }
    }
}

//! Zhipu Provider
//!
//! Terminal handler: sends the rendered prompt to the chat completions endpoint and prices the
//! reported usage.

use async_trait::async_trait;
use reqwest::header::RETRY_AFTER;
use std::time::Instant;
use tracing::{debug, warn};

use super::client::{ChatCompletionRequest, Completion, ZhipuClient};
use super::{PROVIDER_NAME, ZhipuConfig};
use crate::config::ProviderConfig;
use crate::core::context::RequestContext;
use crate::core::cost::calculate_cost;
use crate::core::handler::Handler;
use crate::core::providers::unified_provider::ProviderError;
use crate::core::types::{LlmRequest, LlmResponse};
use crate::utils::error::Result;

#[derive(Debug, Clone)]
pub struct ZhipuProvider {
    config: ZhipuConfig,
    http: reqwest::Client,
}

impl ZhipuProvider {
    pub fn new(config: ZhipuConfig) -> std::result::Result<Self, ProviderError> {
        config
            .validate()
            .map_err(|e| ProviderError::configuration(PROVIDER_NAME, e))?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProviderError::configuration(PROVIDER_NAME, e.to_string()))?;

        Ok(Self { config, http })
    }

    pub fn from_provider_config(config: &ProviderConfig) -> std::result::Result<Self, ProviderError> {
        Self::new(ZhipuConfig::from(config))
    }

    pub fn config(&self) -> &ZhipuConfig {
        &self.config
    }

    async fn send(
        &self,
        body: &ChatCompletionRequest,
    ) -> std::result::Result<Completion, ProviderError> {
        let response = self
            .http
            .post(self.config.chat_completions_url())
            .bearer_auth(&self.config.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(PROVIDER_NAME, e))?;

        let status = response.status();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ProviderError::from_reqwest(PROVIDER_NAME, e))?;

        if !status.is_success() {
            return Err(ZhipuClient::transform_error(
                status.as_u16(),
                &bytes,
                retry_after,
            ));
        }

        ZhipuClient::transform_chat_response(&bytes)
    }
}

#[async_trait]
impl Handler for ZhipuProvider {
    fn biz(&self) -> &str {
        PROVIDER_NAME
    }

    async fn handle(&self, ctx: &RequestContext, req: LlmRequest) -> Result<LlmResponse> {
        let body = ZhipuClient::transform_chat_request(&self.config, &req)?;
        let price = req
            .config
            .as_ref()
            .and_then(|c| c.price)
            .unwrap_or(self.config.price_per_token);

        let started = Instant::now();
        let completion = ctx
            .run(async { self.send(&body).await.map_err(Into::into) })
            .await
            .inspect_err(|e| warn!(tid = %req.tid, model = %body.model, error = %e, "zhipu call failed"))?;

        let cost = calculate_cost(PROVIDER_NAME, &completion.usage, price)?;
        debug!(
            tid = %req.tid,
            model = %body.model,
            tokens = cost.tokens,
            amount = cost.amount,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "zhipu call completed"
        );

        Ok(LlmResponse {
            answer: completion.content,
            tokens: cost.tokens,
            amount: cost.amount,
            trace_id: completion
                .id
                .unwrap_or_else(|| ctx.request_id().to_string()),
            outcome: None,
        })
    }
}

//! `question_examine` business handler
//!
//! Renders the grading prompt from the business configuration, calls the provider, and maps
//! the model's verdict to an [`ExamineTier`]. Tokens and amount pass through untouched.

use crate::core::context::RequestContext;
use crate::core::examine::{ExamineTier, parse_verdict};
use crate::core::handler::{Builder, Handler};
use crate::core::types::{BizOutcome, LlmRequest, LlmResponse, RequestInput};
use crate::services::QUESTION_EXAMINE_BIZ;
use crate::utils::error::{DispatchError, Result};
use crate::utils::truncate_string;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct QuestionExamineBizHandlerBuilder;

impl QuestionExamineBizHandlerBuilder {
    pub fn new() -> Self {
        Self
    }
}

impl Builder for QuestionExamineBizHandlerBuilder {
    fn next(&self, next: Arc<dyn Handler>) -> Arc<dyn Handler> {
        Arc::new(QuestionExamineBizHandler { next })
    }
}

pub struct QuestionExamineBizHandler {
    next: Arc<dyn Handler>,
}

#[async_trait]
impl Handler for QuestionExamineBizHandler {
    fn biz(&self) -> &str {
        QUESTION_EXAMINE_BIZ
    }

    async fn handle(&self, ctx: &RequestContext, req: LlmRequest) -> Result<LlmResponse> {
        let RequestInput::Examine(input) = &req.input else {
            return Err(DispatchError::invalid_input(format!(
                "{} expects an examine payload",
                QUESTION_EXAMINE_BIZ
            )));
        };
        if input.answer.trim().is_empty() {
            return Err(DispatchError::invalid_input("answer must not be empty"));
        }

        let prompt = input.render(&req.config()?.prompt_template);
        let resp = self.next.handle(ctx, req.with_prompt(prompt)).await?;

        let tier: ExamineTier = parse_verdict(&resp.answer);
        debug!(
            %tier,
            verdict = %truncate_string(&resp.answer, 80),
            "examine verdict parsed"
        );
        Ok(resp.with_outcome(BizOutcome::Examine(tier)))
    }
}

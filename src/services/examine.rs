//! Typed entry point for the examine business

use super::llm::LlmService;
use crate::core::context::RequestContext;
use crate::core::examine::{ExamineInput, ExamineResult, ExamineTier};
use crate::core::types::{LlmRequest, RequestInput};
use crate::utils::error::Result;

/// Business key of the examine chain
pub const QUESTION_EXAMINE_BIZ: &str = "question_examine";

#[derive(Debug, Clone)]
pub struct ExamineService {
    llm: LlmService,
}

impl ExamineService {
    pub fn new(llm: LlmService) -> Self {
        Self { llm }
    }

    /// Grade `input` for `uid`. `tid` deduplicates the debit and the usage record.
    pub async fn examine(
        &self,
        ctx: &RequestContext,
        uid: i64,
        tid: impl Into<String>,
        input: ExamineInput,
    ) -> Result<ExamineResult> {
        let tid = tid.into();
        let req = LlmRequest::new(
            QUESTION_EXAMINE_BIZ,
            uid,
            tid.clone(),
            RequestInput::Examine(input),
        );
        let resp = self.llm.invoke(ctx, req).await?;

        Ok(ExamineResult {
            tier: resp.examine_tier().unwrap_or(ExamineTier::Failed),
            raw_result: resp.answer,
            tokens: resp.tokens,
            amount: resp.amount,
            tid,
        })
    }
}

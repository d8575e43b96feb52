//! Test fixtures
//!
//! Real objects with sensible defaults, no mocks.

use llm_dispatch::config::Config;
use llm_dispatch::core::examine::{ExamineInput, ReferenceAnswer};
use llm_dispatch::BizConfig;
use serde_json::{Value, json};

pub const EXAMINE_TEMPLATE: &str =
    "Q: {title}\n15K: {basic}\n25K: {intermediate}\n35K: {advanced}\nA: {answer}";

/// `question_examine` configuration charging `price` per token
pub fn examine_config(price: i64) -> BizConfig {
    BizConfig {
        biz: "question_examine".to_string(),
        model: "glm-4".to_string(),
        price: Some(price),
        temperature: 0.2,
        top_p: 0.7,
        max_tokens: Some(512),
        system_prompt: "Grade the answer. First line: 15K, 25K, 35K or failed.".to_string(),
        prompt_template: EXAMINE_TEMPLATE.to_string(),
    }
}

/// Configuration with the examine business seeded
pub fn config_with_examine(price: i64) -> Config {
    let mut config = Config::default();
    config.provider.api_key = "test-key".to_string();
    config.businesses.push(examine_config(price));
    config
}

pub fn reference_answer() -> ReferenceAnswer {
    ReferenceAnswer {
        basic: "A value has exactly one owner.".to_string(),
        intermediate: "Borrows are either shared or mutable, never both.".to_string(),
        advanced: "Interior mutability moves the borrow check to runtime.".to_string(),
    }
}

/// An answer covering the basic and intermediate sections
pub fn intermediate_answer() -> ExamineInput {
    ExamineInput::new(
        "Explain ownership and borrowing",
        "Every value has one owner. You can hand out many shared borrows or one mutable borrow.",
        reference_answer(),
    )
}

/// Chat completions body as the backend returns it
pub fn completion_body(id: &str, content: &str, total_tokens: i64) -> Value {
    json!({
        "id": id,
        "created": 1_717_000_000,
        "model": "glm-4",
        "choices": [{
            "index": 0,
            "finish_reason": "stop",
            "message": {"role": "assistant", "content": content}
        }],
        "usage": {
            "prompt_tokens": total_tokens - 20,
            "completion_tokens": 20,
            "total_tokens": total_tokens
        }
    })
}

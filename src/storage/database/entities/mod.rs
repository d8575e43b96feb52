/// Business configuration entity module
pub mod ai_config;
/// Credit log entity module
pub mod llm_credit_log;
/// Usage record entity module
pub mod llm_record;

pub use ai_config::Entity as AiConfig;
pub use llm_credit_log::Entity as LlmCreditLog;
pub use llm_record::Entity as LlmRecord;

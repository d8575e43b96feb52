//! Services module
//!
//! The credit collaborator consumed by the credit handler, and the typed entry points callers
//! use in front of the facade.

pub mod credit;
pub mod examine;
pub mod llm;

pub use credit::{CreditService, InMemoryCreditLedger};
pub use examine::{ExamineService, QUESTION_EXAMINE_BIZ};
pub use llm::LlmService;

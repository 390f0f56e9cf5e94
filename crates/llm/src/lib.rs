//! LLM provider chain and retrieval-grounded answering.

pub mod answerer;
pub mod provider;
pub mod providers;

pub use answerer::{Answer, AnswerError, Answerer, AttemptState};
pub use provider::{LlmError, LlmProvider, Message, Role};
pub use providers::{build_chain, ProviderStatus};

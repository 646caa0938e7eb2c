mod pipeline;
mod prompt;
mod types;

#[cfg(test)]
pub(crate) use pipeline::testing;
pub use pipeline::{validate_query, ChatPipeline, NO_ANSWER_FALLBACK, NO_RESULTS_ANSWER};
pub use prompt::{build_messages, DEFAULT_SYSTEM_PROMPT};
pub use types::{ChatRequest, ChatResponse};

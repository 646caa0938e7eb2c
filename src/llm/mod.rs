mod openai;
mod provider;
mod types;

pub use openai::OpenAiProvider;
pub use provider::{ChatProvider, EmbeddingProvider};
pub use types::{ChatMessage, CompletionRequest};

//! Similarity-search collaborator of the chat pipeline.
//! Indexing happens elsewhere; this side only queries.

use async_trait::async_trait;
use serde_json::Value;

use super::source::Source;
use crate::core::errors::ProviderError;

#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Returns up to `limit` chunks ranked by the store, most similar first.
    /// The order is kept as-is by callers.
    async fn search(
        &self,
        query_embedding: &[f32],
        limit: usize,
        filter: &Value,
    ) -> Result<Vec<Source>, ProviderError>;
}

//! Supabase (PostgREST) similarity search through an RPC function such as
//! `match_documents(query_embedding, match_count, filter)`.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::source::{PageRef, Source};
use super::store::VectorStore;
use crate::core::config::VectorStoreConfig;
use crate::core::errors::ProviderError;

const SERVICE: &str = "vector store";

#[derive(Clone)]
pub struct SupabaseStore {
    base_url: String,
    service_key: String,
    match_function: String,
    client: Client,
}

impl SupabaseStore {
    pub fn new(
        base_url: impl Into<String>,
        service_key: impl Into<String>,
        match_function: impl Into<String>,
        client: Client,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            service_key: service_key.into(),
            match_function: match_function.into(),
            client,
        }
    }

    /// `None` when the endpoint or the service key is not configured.
    pub fn from_config(config: &VectorStoreConfig) -> Result<Option<Self>, ProviderError> {
        let (Some(url), Some(key)) = (config.url.as_deref(), config.service_key.as_deref()) else {
            return Ok(None);
        };
        if url.trim().is_empty() || key.trim().is_empty() {
            return Ok(None);
        }
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Some(Self::new(url, key, &config.match_function, client)))
    }

    fn rpc_url(&self) -> String {
        format!("{}/rest/v1/rpc/{}", self.base_url, self.match_function)
    }
}

#[derive(Serialize)]
struct MatchRequest<'a> {
    query_embedding: &'a [f32],
    match_count: usize,
    filter: &'a Value,
}

#[derive(Deserialize)]
struct MatchRow {
    id: i64,
    content: String,
    #[serde(default)]
    metadata: Value,
    similarity: f64,
    #[serde(default)]
    chunk_index: Option<i64>,
}

impl From<MatchRow> for Source {
    fn from(row: MatchRow) -> Self {
        Source {
            id: row.id,
            page: PageRef::from_metadata(&row.metadata),
            content: row.content,
            similarity: row.similarity,
            chunk_index: row.chunk_index,
        }
    }
}

#[async_trait]
impl VectorStore for SupabaseStore {
    async fn search(
        &self,
        query_embedding: &[f32],
        limit: usize,
        filter: &Value,
    ) -> Result<Vec<Source>, ProviderError> {
        let body = MatchRequest {
            query_embedding,
            match_count: limit,
            filter,
        };

        let res = self
            .client
            .post(self.rpc_url())
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .json(&body)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                service: SERVICE,
                status: status.as_u16(),
                body: text,
            });
        }

        // PostgREST answers `null` for a set-returning function with no rows
        // in some configurations.
        let rows: Option<Vec<MatchRow>> = res
            .json()
            .await
            .map_err(|e| ProviderError::decode(SERVICE, e.to_string()))?;

        Ok(rows
            .unwrap_or_default()
            .into_iter()
            .map(Source::from)
            .collect())
    }
}

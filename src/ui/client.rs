use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;

use crate::chat::{ChatRequest, ChatResponse};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("chat service returned {status}: {body}")]
    Status { status: u16, body: String },
}

#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn send(&self, message: &str) -> Result<ChatResponse, ClientError>;
}

/// Posts `{message}` to a chat handler endpoint.
#[derive(Clone)]
pub struct HttpChatClient {
    url: String,
    client: Client,
}

impl HttpChatClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(url, Client::new())
    }

    pub fn with_client(url: impl Into<String>, client: Client) -> Self {
        Self {
            url: url.into(),
            client,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ChatClient for HttpChatClient {
    async fn send(&self, message: &str) -> Result<ChatResponse, ClientError> {
        let res = self
            .client
            .post(&self.url)
            .json(&ChatRequest::new(message))
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(res.json::<ChatResponse>().await?)
    }
}

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

/// Request-level failures of the chat handler.
///
/// The `Display` text is what the caller sees; stage details stay in the
/// server log.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Empty query")]
    EmptyInput,
    #[error("{0}")]
    BadRequest(String),
    #[error("Missing required configuration")]
    ConfigurationMissing,
    #[error("Failed to generate embedding")]
    EmbeddingFailure,
    #[error("Failed to search knowledge base")]
    SearchFailure,
    #[error("Failed to generate answer")]
    GenerationFailure,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::EmptyInput | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::ConfigurationMissing
            | ApiError::EmbeddingFailure
            | ApiError::SearchFailure
            | ApiError::GenerationFailure => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let body = Json(json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}

/// Failure of a single call to a hosted collaborator.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{service} returned {status}: {body}")]
    Status {
        service: &'static str,
        status: u16,
        body: String,
    },
    #[error("unexpected response from {service}: {message}")]
    Decode {
        service: &'static str,
        message: String,
    },
}

impl ProviderError {
    pub fn decode(service: &'static str, message: impl Into<String>) -> Self {
        ProviderError::Decode {
            service,
            message: message.into(),
        }
    }
}

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use tracing::Instrument;
use uuid::Uuid;

use crate::chat::{validate_query, ChatRequest};
use crate::core::errors::ApiError;
use crate::state::AppState;

/// The body is parsed as JSON whatever its `Content-Type`.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let span = tracing::info_span!("chat", request_id = %Uuid::new_v4());

    async move {
        let request: ChatRequest = serde_json::from_slice(&body).map_err(|e| {
            tracing::warn!("Rejected chat body: {}", e);
            ApiError::BadRequest(format!("Invalid JSON body: {}", e))
        })?;

        validate_query(request.message.as_deref())?;

        let Some(pipeline) = state.chat.as_ref() else {
            tracing::error!(missing = ?state.missing_config, "Chat requested without credentials");
            return Err(ApiError::ConfigurationMissing);
        };

        let response = pipeline.answer(request.message.as_deref()).await?;
        Ok(Json(response))
    }
    .instrument(span)
    .await
}

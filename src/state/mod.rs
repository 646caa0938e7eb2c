use std::sync::Arc;

use crate::chat::ChatPipeline;
use crate::core::config::AppConfig;

pub mod error;

use error::InitializationError;

/// Shared application state handed to every route.
///
/// `chat` is `None` when a credential is missing; the service still starts
/// so `/health` can report what to configure.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub chat: Option<Arc<ChatPipeline>>,
    pub missing_config: Vec<&'static str>,
}

impl AppState {
    pub fn initialize(config: AppConfig) -> Result<Arc<Self>, InitializationError> {
        let missing_config = config.missing_credentials();
        let chat = if missing_config.is_empty() {
            ChatPipeline::from_config(&config)
                .map_err(|e| InitializationError::Pipeline(e.into()))?
                .map(Arc::new)
        } else {
            None
        };

        Ok(Arc::new(AppState {
            config: Arc::new(config),
            chat,
            missing_config,
        }))
    }

    /// State around an already-built pipeline.
    pub fn with_pipeline(config: AppConfig, pipeline: ChatPipeline) -> Arc<Self> {
        Arc::new(AppState {
            config: Arc::new(config),
            chat: Some(Arc::new(pipeline)),
            missing_config: Vec::new(),
        })
    }

    pub fn is_degraded(&self) -> bool {
        self.chat.is_none()
    }
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InitializationError {
    #[error("Failed to initialize chat pipeline: {0}")]
    Pipeline(#[source] anyhow::Error),
}

use thiserror::Error;

/// A failure reported by the payload transport.
///
/// The engine never retries; `retryable` is passed through for the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Transport failure: {message}")]
pub struct TransportError {
    pub message: String,
    pub retryable: bool,
}

impl TransportError {
    pub fn new(message: impl Into<String>, retryable: bool) -> Self {
        Self { message: message.into(), retryable }
    }
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] configuration::ConfigError),

    #[error("Decision resolver error: {0}")]
    Decision(#[from] decision::DecisionError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Request {request_id} for project '{project_id}' was superseded by a newer request.")]
    StaleRequest {
        request_id: uuid::Uuid,
        project_id: String,
    },

    #[error("Serialization/deserialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Top-level error type for the AgriChain data layer.
/// Repository-level errors always propagate to the caller as `Err`;
/// malformed stored documents are healed before any repository call
/// executes and never surface here.
#[derive(Debug, thiserror::Error)]
pub enum AgriError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("network error: unable to connect to server")]
    Network,

    #[error("storage error: {message}")]
    Storage { message: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl AgriError {
    /// Shorthand for a `NotFound` against a named collection.
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Shorthand for a storage-layer failure.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}

/// Convenience type alias.
pub type AgriResult<T> = Result<T, AgriError>;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RentscopeError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Analysis failed: {0}")]
    EstimationFailed(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Share payload error: {0}")]
    Share(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for RentscopeError {
    fn from(e: serde_json::Error) -> Self {
        RentscopeError::SerializationError(e.to_string())
    }
}

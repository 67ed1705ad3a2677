use thiserror::Error;
use uuid::Uuid;

/// Error type that captures common subscription-tracking failures.
#[derive(Debug, Error)]
pub enum SubtrackError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Unsupported {field} code `{value}`")]
    UnsupportedEnum {
        field: &'static str,
        value: String,
    },
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Subscription not found: {0}")]
    NotFound(Uuid),
}

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {field} reading: {raw:?}")]
pub struct InvalidInputError {
    pub field: &'static str,
    pub raw: String,
}

impl InvalidInputError {
    pub fn new(field: &'static str, raw: impl Into<String>) -> Self {
        Self {
            field,
            raw: raw.into(),
        }
    }
}

/// Why the remote heart-beat check produced no verdict.
#[derive(Debug, Error)]
pub enum ClassificationUnavailable {
    #[error("health check request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("health check returned HTTP {0}")]
    Status(StatusCode),
    #[error("malformed health check response: {0}")]
    Malformed(String),
}

//! Error types for hl-core

use thiserror::Error;

/// Main error type for the HighLevel crates
#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HighLevel API error: {status} - {body}")]
    Api { status: u16, body: String },

    #[error("HighLevel rejected the credentials: {0}")]
    Unauthorized(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid contact ID: {0:?}")]
    InvalidContactId(String),

    #[error("Operation cancelled")]
    Cancelled,
}

impl Error {
    /// Whether this error is the cancellation outcome rather than a failure
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }
}

/// Result type alias for hl-core
pub type Result<T> = std::result::Result<T, Error>;

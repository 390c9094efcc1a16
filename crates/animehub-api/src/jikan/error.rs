use thiserror::Error;

/// Errors from the Jikan API client.
#[derive(Debug, Error)]
pub enum JikanError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("parse error: {0}")]
    Parse(String),
}

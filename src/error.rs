//! Error types shared by every stage of a sweep

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SweepError {
    /// The OAuth handshake was rejected; carries the raw response text
    #[error("Authorization failed: {0}")]
    Auth(String),

    /// An authenticated API call failed; carries the parsed JSON error body
    #[error("API request failed with status {status}: {body}")]
    Api {
        status: u16,
        body: serde_json::Value,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Signing error: {0}")]
    Signing(String),

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl SweepError {
    /// Platform error codes reported in an API error body, if any
    pub fn api_error_codes(&self) -> Vec<i64> {
        match self {
            SweepError::Api { body, .. } => body
                .get("errors")
                .and_then(|errors| errors.as_array())
                .map(|errors| {
                    errors
                        .iter()
                        .filter_map(|e| e.get("code").and_then(|c| c.as_i64()))
                        .collect()
                })
                .unwrap_or_default(),
            _ => Vec::new(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SweepError>;

//! Error types for the quiz server clients.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors building an [`ApiClient`](crate::ApiClient).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ClientError {
    #[error("invalid server base URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),
}

/// Errors from `GET /api/time-remaining/{id}`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TimeRemainingError {
    #[error("time source unreachable: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("time source returned status {0}")]
    Status(StatusCode),
    #[error("malformed time source payload: {0}")]
    Payload(String),
}

/// Errors from the quiz submit endpoint.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SubmitError {
    #[error("quiz submission rejected with status {0}")]
    Status(StatusCode),
    #[error("quiz submission failed after {attempts} attempts: {source}")]
    Connection {
        attempts: u32,
        #[source]
        source: reqwest::Error,
    },
    #[error("quiz submission request error: {0}")]
    Request(#[source] reqwest::Error),
}

/// Errors from `POST /api/run-code`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RunError {
    #[error("{0}")]
    Transport(#[source] reqwest::Error),
    #[error("run-code endpoint returned status {0}")]
    Status(StatusCode),
    #[error("malformed run-code payload: {0}")]
    Payload(String),
}

impl RunError {
    /// Text for the output panel when the request itself failed.
    #[must_use]
    pub fn display_text(&self) -> String {
        format!("Error: {self}")
    }
}

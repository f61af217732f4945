//! Transport error types.

use std::time::Duration;

use thiserror::Error;

use crate::response::GraphqlError;

/// Errors that can occur when talking to the storefront channel.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Failed to build or send the request.
    #[error("Request failed: {0}")]
    RequestError(String),

    /// Could not reach the endpoint at all.
    #[error("Connection failed: {0}")]
    ConnectError(String),

    /// Request timed out.
    #[error("Request timed out")]
    Timeout,

    /// HTTP error response.
    #[error("HTTP {status}: {message}")]
    HttpError { status: u16, message: String },

    /// The backend is throttling this client.
    #[error("Rate limited by storefront")]
    RateLimited { retry_after: Option<Duration> },

    /// Request-level errors reported in the response envelope.
    #[error("GraphQL errors: {}", join_messages(.0))]
    GraphqlErrors(Vec<GraphqlError>),

    /// The envelope carried neither data nor errors.
    #[error("Response contained no data")]
    MissingData,

    /// Failed to parse the response body.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(String),
}

impl FetchError {
    /// Whether a retry could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::ConnectError(_) | FetchError::Timeout => true,
            FetchError::HttpError { status, .. } => (500..600).contains(status),
            _ => false,
        }
    }

    /// Whether the request never reached the server.
    pub fn is_connect(&self) -> bool {
        matches!(self, FetchError::ConnectError(_))
    }

    /// Whether the backend asked us to slow down.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, FetchError::RateLimited { .. })
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::JsonError(e.to_string())
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else if e.is_connect() {
            FetchError::ConnectError(e.to_string())
        } else if e.is_decode() {
            FetchError::ParseError(e.to_string())
        } else {
            FetchError::RequestError(e.to_string())
        }
    }
}

fn join_messages(errors: &[GraphqlError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

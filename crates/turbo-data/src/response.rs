//! GraphQL response envelope.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::FetchError;

/// Error code the storefront uses when throttling a client.
pub const THROTTLED_CODE: &str = "THROTTLED";

/// A single request-level error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphqlError {
    /// Human-readable message.
    pub message: String,
    /// Path within the response where the error occurred.
    #[serde(default)]
    pub path: Vec<serde_json::Value>,
    /// Extensions metadata (carries `code`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<serde_json::Value>,
}

impl GraphqlError {
    /// Create an error with only a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: Vec::new(),
            extensions: None,
        }
    }

    /// The `extensions.code` value, if any.
    pub fn code(&self) -> Option<&str> {
        self.extensions
            .as_ref()
            .and_then(|ext| ext.get("code"))
            .and_then(|code| code.as_str())
    }
}

/// The envelope every storefront response arrives in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphqlResponse {
    /// Result data.
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    /// Request-level errors.
    #[serde(default)]
    pub errors: Vec<GraphqlError>,
}

impl GraphqlResponse {
    /// Wrap a data payload.
    pub fn from_data(data: serde_json::Value) -> Self {
        Self {
            data: Some(data),
            errors: Vec::new(),
        }
    }

    /// Whether any error reports throttling.
    pub fn is_throttled(&self) -> bool {
        self.errors.iter().any(|e| e.code() == Some(THROTTLED_CODE))
    }

    /// Check the error list and decode `data`.
    ///
    /// A non-empty error list fails the whole request, even if partial
    /// data is present.
    pub fn into_data<T: DeserializeOwned>(self) -> Result<T, FetchError> {
        if self.is_throttled() {
            return Err(FetchError::RateLimited { retry_after: None });
        }
        if !self.errors.is_empty() {
            return Err(FetchError::GraphqlErrors(self.errors));
        }
        let data = self.data.ok_or(FetchError::MissingData)?;
        serde_json::from_value(data).map_err(|e| FetchError::ParseError(e.to_string()))
    }
}

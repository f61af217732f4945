//! GraphQL request envelope and typed operations.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::FetchError;

/// A typed storefront operation.
///
/// Implement this once per query or mutation document.
pub trait Operation {
    /// Variables sent alongside the document.
    type Variables: Serialize;
    /// Shape of the `data` member of a successful response.
    type ResponseData: DeserializeOwned;

    /// GraphQL document text.
    const QUERY: &'static str;
    /// Operation name (used for logging and routing).
    const OPERATION_NAME: &'static str;

    /// Whether this operation writes remote state.
    ///
    /// Mutations are only retried when the request never left the client.
    fn is_mutation() -> bool {
        false
    }
}

/// The body POSTed to the storefront endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphqlRequest {
    /// Document text.
    pub query: String,
    /// Variables object.
    pub variables: serde_json::Value,
    /// Optional operation name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,
    /// Whether a retry after an ambiguous failure is safe.
    #[serde(skip)]
    pub idempotent: bool,
}

impl GraphqlRequest {
    /// Create an idempotent request from raw parts.
    pub fn new(query: impl Into<String>, variables: serde_json::Value) -> Self {
        Self {
            query: query.into(),
            variables,
            operation_name: None,
            idempotent: true,
        }
    }

    /// Build the request for a typed operation.
    pub fn for_operation<O: Operation>(variables: &O::Variables) -> Result<Self, FetchError> {
        Ok(Self {
            query: O::QUERY.to_string(),
            variables: serde_json::to_value(variables)?,
            operation_name: Some(O::OPERATION_NAME.to_string()),
            idempotent: !O::is_mutation(),
        })
    }

    /// Attach an operation name.
    pub fn with_operation_name(mut self, name: impl Into<String>) -> Self {
        self.operation_name = Some(name.into());
        self
    }

    /// Name used in logs.
    pub fn display_name(&self) -> &str {
        self.operation_name.as_deref().unwrap_or("anonymous")
    }
}

//! Storefront GraphQL transport for TurboCommerce.
//!
//! All reads and writes against the hosted commerce backend travel one
//! channel: a POST of `{query, variables, operationName}` to a single
//! endpoint, authenticated by a static token header.
//!
//! # Example
//!
//! ```rust,ignore
//! use turbo_data::{execute, StorefrontClient, StorefrontConfig};
//!
//! let client = StorefrontClient::new(
//!     StorefrontConfig::new("https://shop.example.com/api/2024-07/graphql.json")
//!         .with_access_token(token),
//! )?;
//!
//! let data = execute::<ProductByHandle, _>(&client, &vars).await?;
//! ```

mod client;
mod error;
mod request;
mod response;
mod retry;

use async_trait::async_trait;

pub use client::{StorefrontClient, StorefrontConfig, ACCESS_TOKEN_HEADER};
pub use error::FetchError;
pub use request::{GraphqlRequest, Operation};
pub use response::{GraphqlError, GraphqlResponse, THROTTLED_CODE};
pub use retry::{BackoffStrategy, RetryPolicy};

/// The seam between commerce logic and the wire.
///
/// [`StorefrontClient`] is the production implementation; tests supply
/// scripted ones.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one request and return its envelope.
    async fn send(&self, request: &GraphqlRequest) -> Result<GraphqlResponse, FetchError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn send(&self, request: &GraphqlRequest) -> Result<GraphqlResponse, FetchError> {
        (**self).send(request).await
    }
}

/// Run a typed operation and decode its data.
pub async fn execute<O, T>(transport: &T, variables: &O::Variables) -> Result<O::ResponseData, FetchError>
where
    O: Operation,
    T: Transport + ?Sized,
{
    let request = GraphqlRequest::for_operation::<O>(variables)?;
    transport.send(&request).await?.into_data()
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        execute, FetchError, GraphqlRequest, GraphqlResponse, Operation, StorefrontClient,
        StorefrontConfig, Transport,
    };
}

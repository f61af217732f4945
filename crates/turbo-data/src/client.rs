//! HTTP client for the storefront endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE, RETRY_AFTER};
use reqwest::StatusCode;
use tracing::{debug, warn};

use crate::request::GraphqlRequest;
use crate::response::GraphqlResponse;
use crate::retry::RetryPolicy;
use crate::{FetchError, Transport};

/// Header carrying the static storefront token.
pub const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Storefront-Access-Token";

/// Longest error body kept in [`FetchError::HttpError`].
const MAX_ERROR_BODY: usize = 512;

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// GraphQL endpoint URL.
    pub endpoint: String,
    /// Static access token.
    pub access_token: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Retry policy applied to every request.
    pub retry: RetryPolicy,
}

impl StorefrontConfig {
    /// Create a configuration for an endpoint.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            access_token: None,
            timeout: Duration::from_secs(10),
            retry: RetryPolicy::default(),
        }
    }

    /// Set the access token.
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

/// Client for the remote storefront channel.
///
/// Every read and write travels through [`StorefrontClient::send`], which
/// applies the configured retry policy.
#[derive(Debug, Clone)]
pub struct StorefrontClient {
    http: reqwest::Client,
    config: StorefrontConfig,
}

impl StorefrontClient {
    /// Build a client from configuration.
    pub fn new(config: StorefrontConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(token) = &config.access_token {
            let value = HeaderValue::from_str(token)
                .map_err(|e| FetchError::RequestError(format!("invalid access token: {}", e)))?;
            headers.insert(ACCESS_TOKEN_HEADER, value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self { http, config })
    }

    /// The configured endpoint.
    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    async fn send_once(&self, request: &GraphqlRequest) -> Result<GraphqlResponse, FetchError> {
        let response = self
            .http
            .post(&self.config.endpoint)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_secs);
            return Err(FetchError::RateLimited { retry_after });
        }

        if !status.is_success() {
            let mut message = response.text().await.unwrap_or_default();
            if message.len() > MAX_ERROR_BODY {
                let mut cut = MAX_ERROR_BODY;
                while !message.is_char_boundary(cut) {
                    cut -= 1;
                }
                message.truncate(cut);
            }
            return Err(FetchError::HttpError {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| FetchError::ParseError(e.to_string()))
    }
}

#[async_trait]
impl Transport for StorefrontClient {
    async fn send(&self, request: &GraphqlRequest) -> Result<GraphqlResponse, FetchError> {
        let retry = &self.config.retry;
        let mut attempt = 0;
        loop {
            debug!(operation = request.display_name(), attempt, "sending storefront request");
            match self.send_once(request).await {
                Ok(response) => return Ok(response),
                Err(err) if retry.should_retry(&err, attempt, request.idempotent) => {
                    let delay = retry.delay(attempt);
                    warn!(
                        operation = request.display_name(),
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "storefront request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

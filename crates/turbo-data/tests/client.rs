use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use turbo_data::{
    execute, BackoffStrategy, FetchError, Operation, RetryPolicy, StorefrontClient,
    StorefrontConfig, ACCESS_TOKEN_HEADER,
};

#[derive(Debug, Serialize)]
struct HandleVars {
    handle: String,
}

#[derive(Debug, Deserialize)]
struct ProductData {
    product: Option<ProductNode>,
}

#[derive(Debug, Deserialize)]
struct ProductNode {
    title: String,
}

struct ProductByHandle;

impl Operation for ProductByHandle {
    type Variables = HandleVars;
    type ResponseData = ProductData;

    const QUERY: &'static str = "query ProductByHandle($handle: String!) { product(handle: $handle) { title } }";
    const OPERATION_NAME: &'static str = "ProductByHandle";
}

struct TouchCart;

impl Operation for TouchCart {
    type Variables = HandleVars;
    type ResponseData = serde_json::Value;

    const QUERY: &'static str = "mutation TouchCart { __typename }";
    const OPERATION_NAME: &'static str = "TouchCart";

    fn is_mutation() -> bool {
        true
    }
}

fn client_for(server: &MockServer, retries: u32) -> StorefrontClient {
    let config = StorefrontConfig::new(format!("{}/graphql", server.uri()))
        .with_access_token("secret-token")
        .with_timeout(Duration::from_secs(5))
        .with_retry(
            RetryPolicy::new(retries)
                .with_backoff(BackoffStrategy::None)
                .with_jitter(Duration::ZERO),
        );
    StorefrontClient::new(config).unwrap()
}

fn vars() -> HandleVars {
    HandleVars {
        handle: "premier-kit".to_string(),
    }
}

#[tokio::test]
async fn sends_token_and_decodes_data() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(header(ACCESS_TOKEN_HEADER, "secret-token"))
        .and(body_partial_json(json!({
            "operationName": "ProductByHandle",
            "variables": {"handle": "premier-kit"}
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": {"product": {"title": "Premier Kit"}}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, 0);
    let data = execute::<ProductByHandle, _>(&client, &vars()).await.unwrap();
    assert_eq!(data.product.unwrap().title, "Premier Kit");
}

#[tokio::test]
async fn retries_server_errors_for_queries() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(2)
        .with_priority(1)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"product": null}})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, 2);
    let data = execute::<ProductByHandle, _>(&client, &vars()).await.unwrap();
    assert!(data.product.is_none());
}

#[tokio::test]
async fn gives_up_after_bounded_retries() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .expect(3)
        .mount(&server)
        .await;

    let client = client_for(&server, 2);
    let err = execute::<ProductByHandle, _>(&client, &vars())
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::HttpError { status: 503, .. }));
}

#[tokio::test]
async fn does_not_retry_mutations_on_server_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, 3);
    let err = execute::<TouchCart, _>(&client, &vars()).await.unwrap_err();
    assert!(matches!(err, FetchError::HttpError { status: 500, .. }));
}

#[tokio::test]
async fn rate_limit_surfaces_retry_after() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "7"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, 3);
    let err = execute::<ProductByHandle, _>(&client, &vars())
        .await
        .unwrap_err();
    match err {
        FetchError::RateLimited { retry_after } => {
            assert_eq!(retry_after, Some(Duration::from_secs(7)));
        }
        other => panic!("expected rate limit, got {other:?}"),
    }
}

#[tokio::test]
async fn top_level_errors_fail_the_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [{"message": "Field 'bogus' doesn't exist"}]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, 0);
    let err = execute::<ProductByHandle, _>(&client, &vars())
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::GraphqlErrors(_)));
}

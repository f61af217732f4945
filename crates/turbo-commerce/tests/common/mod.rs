//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};
use turbo_data::{FetchError, GraphqlError, GraphqlRequest, GraphqlResponse, Transport};

/// Replays canned responses in order and records every request.
///
/// Each send yields to the scheduler once before answering, so a caller
/// that awaits it is genuinely suspended.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<GraphqlResponse, FetchError>>>,
    requests: Mutex<Vec<GraphqlRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful `data` payload.
    pub fn reply(self, data: Value) -> Self {
        self.push(Ok(GraphqlResponse::from_data(data)))
    }

    /// Queue a transport failure.
    pub fn fail(self, error: FetchError) -> Self {
        self.push(Err(error))
    }

    /// Queue a GraphQL-level throttle.
    pub fn throttle(self) -> Self {
        let mut error = GraphqlError::new("Throttled");
        error.extensions = Some(json!({"code": "THROTTLED"}));
        self.push(Ok(GraphqlResponse {
            data: None,
            errors: vec![error],
        }))
    }

    fn push(self, response: Result<GraphqlResponse, FetchError>) -> Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    pub fn requests(&self) -> Vec<GraphqlRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn operation_names(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|r| r.display_name().to_string())
            .collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &GraphqlRequest) -> Result<GraphqlResponse, FetchError> {
        self.requests.lock().unwrap().push(request.clone());
        tokio::task::yield_now().await;
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(FetchError::RequestError("script exhausted".into())))
    }
}

pub fn line(id: &str, variant: &str, quantity: u32, attributes: Value) -> Value {
    json!({
        "id": id,
        "quantity": quantity,
        "attributes": attributes,
        "merchandise": {
            "id": variant,
            "title": "Default Title",
            "price": {"amount": "25.00", "currencyCode": "USD"},
            "product": {"title": format!("Product {variant}"), "handle": variant}
        }
    })
}

pub fn cart(id: &str, lines: Vec<Value>) -> Value {
    let quantity: u64 = lines.iter().filter_map(|l| l["quantity"].as_u64()).sum();
    json!({
        "id": id,
        "checkoutUrl": format!("https://shop.example.com/cart/c/{id}"),
        "totalQuantity": quantity,
        "updatedAt": "2026-03-01T09:30:00Z",
        "cost": {
            "subtotalAmount": {"amount": "0.00", "currencyCode": "USD"},
            "totalAmount": {"amount": "0.00", "currencyCode": "USD"}
        },
        "lines": {"nodes": lines}
    })
}

/// `{field: {cart, userErrors: []}}`.
pub fn payload(field: &str, cart: Value) -> Value {
    json!({ field: {"cart": cart, "userErrors": []} })
}

pub fn product(handle: &str, title: &str, variants: Value, metafields: Option<(&str, &str)>) -> Value {
    let (components, premier) = match metafields {
        Some((c, p)) => (json!({"value": c}), json!({"value": p})),
        None => (Value::Null, Value::Null),
    };
    json!({
        "product": {
            "id": format!("gid://shopify/Product/{handle}"),
            "title": title,
            "handle": handle,
            "availableForSale": true,
            "variants": {"nodes": variants},
            "bundleComponents": components,
            "includesPremier": premier
        }
    })
}

pub fn variant(id: &str, title: &str, available: bool) -> Value {
    json!({
        "id": id,
        "title": title,
        "availableForSale": available,
        "price": {"amount": "12.00", "currencyCode": "USD"}
    })
}

mod common;

use std::sync::Arc;

use common::{cart, line, payload, product, variant, ScriptedTransport};
use serde_json::json;
use turbo_cache::{Cache, MemoryStore};
use turbo_commerce::cart::{AddToCart, CartManager, CartStatus, CART_ID_KEY};
use turbo_commerce::{CartId, CartLineId, CommerceError};
use turbo_data::FetchError;

type Manager = CartManager<ScriptedTransport, Arc<MemoryStore>>;

fn manager(transport: ScriptedTransport, cart_id: Option<&str>) -> (Manager, Arc<ScriptedTransport>, Arc<MemoryStore>) {
    let transport = Arc::new(transport);
    let store = Arc::new(MemoryStore::new());
    if let Some(id) = cart_id {
        Cache::new(Arc::clone(&store))
            .set(CART_ID_KEY, &CartId::new(id))
            .unwrap();
    }
    let manager = CartManager::new(Arc::clone(&transport), Arc::clone(&store));
    (manager, transport, store)
}

fn persisted_id(store: &Arc<MemoryStore>) -> Option<CartId> {
    Cache::new(Arc::clone(store)).get(CART_ID_KEY).unwrap()
}

#[tokio::test]
async fn test_first_add_creates_and_persists_cart() {
    let transport = ScriptedTransport::new()
        .reply(payload("cartCreate", cart("gid://shopify/Cart/c1", vec![])))
        .reply(payload(
            "cartLinesAdd",
            cart("gid://shopify/Cart/c1", vec![line("l1", "v123", 2, json!([]))]),
        ));
    let (manager, transport, store) = manager(transport, None);

    let cart = manager.add_to_cart("v123", 2).await.unwrap();

    assert_eq!(cart.lines.len(), 1);
    assert_eq!(cart.lines[0].quantity, 2);
    assert_eq!(cart.lines[0].merchandise.id.as_str(), "v123");
    assert_eq!(
        persisted_id(&store),
        Some(CartId::new("gid://shopify/Cart/c1"))
    );
    assert_eq!(manager.status(), CartStatus::Ready);
    assert_eq!(
        manager.checkout_url().as_deref(),
        Some("https://shop.example.com/cart/c/gid://shopify/Cart/c1")
    );

    let requests = transport.requests();
    assert_eq!(transport.operation_names(), ["CartCreate", "CartLinesAdd"]);
    assert!(requests.iter().all(|r| !r.idempotent));
    assert_eq!(
        requests[1].variables,
        json!({
            "cartId": "gid://shopify/Cart/c1",
            "lines": [{"merchandiseId": "v123", "quantity": 2}]
        })
    );
}

#[tokio::test]
async fn test_concurrent_add_is_rejected() {
    let transport = ScriptedTransport::new().reply(payload(
        "cartLinesAdd",
        cart("c1", vec![line("l1", "v1", 1, json!([]))]),
    ));
    let (manager, transport, _store) = manager(transport, Some("c1"));

    let (first, second) = tokio::join!(manager.add_to_cart("v1", 1), manager.add_to_cart("v2", 1));

    assert!(first.is_ok());
    assert!(matches!(second, Err(CommerceError::MutationInProgress)));
    assert_eq!(transport.operation_names(), ["CartLinesAdd"]);
    assert!(!manager.is_busy());
    assert_eq!(manager.cart().unwrap().lines.len(), 1);
}

#[tokio::test]
async fn test_premier_kit_expands_into_component_lines() {
    let components = r#"[
        {"title": "Deck", "handle": "deck", "quantity": 1, "variantId": "v-deck"},
        {"title": "Wheels", "handle": "wheels", "quantity": 4, "variantTitle": "52mm"},
        {"title": "Wax", "handle": "wax", "quantity": 1, "variantId": "v-wax", "retailPrice": 6.5}
    ]"#;
    let kit_lines = vec![
        line("l1", "v-kit", 2, json!([])),
        line("l2", "v-deck", 2, json!([{"key": "BundleParent", "value": "v-kit"}])),
        line("l3", "v-wheels-52", 8, json!([{"key": "BundleParent", "value": "v-kit"}])),
        line("l4", "v-wax", 2, json!([{"key": "BundleParent", "value": "v-kit"}])),
    ];
    let transport = ScriptedTransport::new()
        .reply(product(
            "starter-kit",
            "Starter Kit",
            json!([variant("v-kit", "Default Title", true)]),
            Some((components, "true")),
        ))
        .reply(product(
            "wheels",
            "Wheels",
            json!([variant("v-wheels-50", "50mm", true), variant("v-wheels-52", "52mm", true)]),
            None,
        ))
        .reply(payload("cartLinesAdd", cart("c1", kit_lines)));
    let (manager, transport, _store) = manager(transport, Some("c1"));

    let request = AddToCart::new("v-kit", 2).with_product_handle("starter-kit");
    let cart = manager.add_product_to_cart(request).await.unwrap();
    assert_eq!(cart.lines.len(), 4);

    assert_eq!(
        transport.operation_names(),
        ["ProductByHandle", "ProductByHandle", "CartLinesAdd"]
    );
    let requests = transport.requests();
    assert_eq!(requests[0].variables["handle"], "starter-kit");
    assert_eq!(requests[0].variables["namespace"], "custom");
    assert_eq!(requests[1].variables["handle"], "wheels");

    let lines = requests[2].variables["lines"].as_array().unwrap().clone();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], json!({"merchandiseId": "v-kit", "quantity": 2}));

    let expected = [("v-deck", 2), ("v-wheels-52", 8), ("v-wax", 2)];
    for (line, (merchandise, quantity)) in lines[1..].iter().zip(expected) {
        assert_eq!(line["merchandiseId"], merchandise);
        assert_eq!(line["quantity"], quantity);
        assert_eq!(
            line["attributes"],
            json!([
                {"key": "IncludedIn", "value": "Starter Kit"},
                {"key": "BundleParent", "value": "v-kit"}
            ])
        );
    }
}

#[tokio::test]
async fn test_kit_without_premier_adds_single_line() {
    let components = r#"[{"title": "Deck", "handle": "deck", "quantity": 1, "variantId": "v-deck"}]"#;
    let transport = ScriptedTransport::new()
        .reply(product(
            "basic-kit",
            "Basic Kit",
            json!([variant("v-basic", "Default Title", true)]),
            Some((components, "false")),
        ))
        .reply(payload("cartLinesAdd", cart("c1", vec![line("l1", "v-basic", 1, json!([]))])));
    let (manager, transport, _store) = manager(transport, Some("c1"));

    let request = AddToCart::new("v-basic", 1).with_product_handle("basic-kit");
    manager.add_product_to_cart(request).await.unwrap();

    let requests = transport.requests();
    assert_eq!(
        requests[1].variables["lines"],
        json!([{"merchandiseId": "v-basic", "quantity": 1}])
    );
}

#[tokio::test]
async fn test_removing_kit_parent_leaves_components() {
    let full = vec![
        line("l1", "v-kit", 1, json!([])),
        line("l2", "v-deck", 1, json!([{"key": "BundleParent", "value": "v-kit"}])),
        line("l3", "v-wax", 1, json!([{"key": "BundleParent", "value": "v-kit"}])),
    ];
    let remaining = full[1..].to_vec();
    let transport = ScriptedTransport::new()
        .reply(json!({"cart": cart("c1", full)}))
        .reply(payload("cartLinesRemove", cart("c1", remaining)));
    let (manager, transport, _store) = manager(transport, Some("c1"));

    manager.rehydrate().await.unwrap();
    let cart = manager.remove_line(&CartLineId::new("l1")).await.unwrap();

    assert_eq!(transport.operation_names(), ["CartQuery", "CartLinesRemove"]);
    assert_eq!(
        transport.requests()[1].variables,
        json!({"cartId": "c1", "lineIds": ["l1"]})
    );
    assert_eq!(cart.lines.len(), 2);
    assert!(cart.lines.iter().all(|l| l.bundle_parent() == Some("v-kit")));
}

#[tokio::test]
async fn test_failed_mutation_keeps_snapshot() {
    let transport = ScriptedTransport::new()
        .reply(json!({"cart": cart("c1", vec![line("l1", "v1", 1, json!([]))])}))
        .fail(FetchError::HttpError {
            status: 502,
            message: "Bad Gateway".into(),
        })
        .reply(payload("cartLinesUpdate", cart("c1", vec![line("l1", "v1", 3, json!([]))])));
    let (manager, _transport, _store) = manager(transport, Some("c1"));

    let before = manager.rehydrate().await.unwrap().unwrap();
    let err = manager
        .update_line(&CartLineId::new("l1"), 3)
        .await
        .unwrap_err();

    assert!(matches!(err, CommerceError::Fetch(FetchError::HttpError { status: 502, .. })));
    assert!(Arc::ptr_eq(&manager.cart().unwrap(), &before));
    assert_eq!(manager.status(), CartStatus::Error);
    assert!(!manager.is_busy());

    let after = manager.update_line(&CartLineId::new("l1"), 3).await.unwrap();
    assert_eq!(after.lines[0].quantity, 3);
    assert_eq!(manager.status(), CartStatus::Ready);
}

#[tokio::test]
async fn test_user_errors_surface_verbatim() {
    let transport = ScriptedTransport::new().reply(json!({
        "cartLinesAdd": {
            "cart": null,
            "userErrors": [{
                "field": ["lines", "0", "merchandiseId"],
                "message": "The merchandise with id v9 does not exist.",
                "code": "INVALID"
            }]
        }
    }));
    let (manager, transport, _store) = manager(transport, Some("c1"));

    let err = manager.add_to_cart("v9", 1).await.unwrap_err();

    assert_eq!(err.to_string(), "The merchandise with id v9 does not exist.");
    match err {
        CommerceError::UserErrors(errors) => {
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].code.as_deref(), Some("INVALID"));
        }
        other => panic!("expected user errors, got {other:?}"),
    }
    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn test_throttled_mutation_is_an_error() {
    let transport = ScriptedTransport::new().throttle();
    let (manager, _transport, _store) = manager(transport, Some("c1"));

    let err = manager.add_to_cart("v1", 1).await.unwrap_err();
    assert!(err.is_rate_limited());
}

#[tokio::test]
async fn test_rehydrate_forgets_unknown_cart() {
    let transport = ScriptedTransport::new().reply(json!({"cart": null}));
    let (manager, _transport, store) = manager(transport, Some("expired"));

    assert!(manager.rehydrate().await.unwrap().is_none());
    assert_eq!(manager.status(), CartStatus::Empty);
    assert_eq!(persisted_id(&store), None);
}

#[tokio::test]
async fn test_rehydrate_without_persisted_id() {
    let (manager, transport, _store) = manager(ScriptedTransport::new(), None);

    assert_eq!(manager.status(), CartStatus::Loading);
    assert!(manager.rehydrate().await.unwrap().is_none());
    assert_eq!(manager.status(), CartStatus::Empty);
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_operations_without_cart() {
    let (manager, transport, _store) = manager(ScriptedTransport::new(), None);

    let err = manager.remove_line(&CartLineId::new("l1")).await.unwrap_err();
    assert!(matches!(err, CommerceError::NoActiveCart));
    let err = manager.update_line(&CartLineId::new("l1"), 2).await.unwrap_err();
    assert!(matches!(err, CommerceError::NoActiveCart));
    assert!(transport.requests().is_empty());
    assert!(!manager.is_busy());
}

#[tokio::test]
async fn test_invalid_quantity_fails_locally() {
    let (manager, transport, _store) = manager(ScriptedTransport::new(), Some("c1"));

    assert!(matches!(
        manager.add_to_cart("v1", 0).await,
        Err(CommerceError::InvalidQuantity(0))
    ));
    assert!(matches!(
        manager.update_line(&CartLineId::new("l1"), 10_000).await,
        Err(CommerceError::QuantityExceedsLimit(10_000, 9999))
    ));
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_update_to_zero_removes_line() {
    let transport =
        ScriptedTransport::new().reply(payload("cartLinesRemove", cart("c1", vec![])));
    let (manager, transport, _store) = manager(transport, Some("c1"));

    let cart = manager.update_line(&CartLineId::new("l1"), 0).await.unwrap();

    assert!(cart.is_empty());
    assert_eq!(transport.operation_names(), ["CartLinesRemove"]);
}

#[tokio::test]
async fn test_clear_cart_is_local() {
    let transport =
        ScriptedTransport::new().reply(json!({"cart": cart("c1", vec![line("l1", "v1", 1, json!([]))])}));
    let (manager, transport, store) = manager(transport, Some("c1"));

    manager.rehydrate().await.unwrap();
    manager.clear_cart().unwrap();

    assert!(manager.cart().is_none());
    assert_eq!(manager.status(), CartStatus::Empty);
    assert_eq!(persisted_id(&store), None);
    assert_eq!(transport.operation_names(), ["CartQuery"]);
}

#[tokio::test]
async fn test_kit_lookup_failure_adds_plain_line() {
    let transport = ScriptedTransport::new()
        .fail(FetchError::Timeout)
        .reply(payload("cartLinesAdd", cart("c1", vec![line("l1", "v-kit", 1, json!([]))])));
    let (manager, transport, _store) = manager(transport, Some("c1"));

    let request = AddToCart::new("v-kit", 1).with_product_handle("starter-kit");
    let cart = manager.add_product_to_cart(request).await.unwrap();

    assert_eq!(cart.lines.len(), 1);
    assert_eq!(transport.operation_names(), ["ProductByHandle", "CartLinesAdd"]);
    assert_eq!(
        transport.requests()[1].variables["lines"],
        json!([{"merchandiseId": "v-kit", "quantity": 1}])
    );
    assert_eq!(manager.status(), CartStatus::Ready);
}

#[tokio::test]
async fn test_unresolvable_component_adds_plain_line() {
    let components = r#"[
        {"title": "Deck", "handle": "deck", "quantity": 1, "variantId": "v-deck"},
        {"title": "Old Grip", "handle": "discontinued", "quantity": 1}
    ]"#;
    let transport = ScriptedTransport::new()
        .reply(product(
            "starter-kit",
            "Starter Kit",
            json!([variant("v-kit", "Default Title", true)]),
            Some((components, "true")),
        ))
        .reply(json!({"product": null}))
        .reply(payload("cartLinesAdd", cart("c1", vec![line("l1", "v-kit", 1, json!([]))])));
    let (manager, transport, _store) = manager(transport, Some("c1"));

    let request = AddToCart::new("v-kit", 1).with_product_handle("starter-kit");
    let cart = manager.add_product_to_cart(request).await.unwrap();

    assert_eq!(cart.lines.len(), 1);
    assert_eq!(
        transport.operation_names(),
        ["ProductByHandle", "ProductByHandle", "CartLinesAdd"]
    );
    let requests = transport.requests();
    assert_eq!(requests[1].variables["handle"], "discontinued");
    assert_eq!(
        requests[2].variables["lines"],
        json!([{"merchandiseId": "v-kit", "quantity": 1}])
    );
}

#[tokio::test]
async fn test_component_quantity_over_cap_fails_before_mutation() {
    let components = r#"[{"title": "Wax", "handle": "wax", "quantity": 100, "variantId": "v-wax"}]"#;
    let transport = ScriptedTransport::new().reply(product(
        "wax-kit",
        "Wax Kit",
        json!([variant("v-kit", "Default Title", true)]),
        Some((components, "true")),
    ));
    let (manager, transport, _store) = manager(transport, Some("c1"));

    let request = AddToCart::new("v-kit", 100).with_product_handle("wax-kit");
    let err = manager.add_product_to_cart(request).await.unwrap_err();

    assert!(matches!(err, CommerceError::QuantityExceedsLimit(10_000, 9999)));
    assert_eq!(transport.operation_names(), ["ProductByHandle"]);
    assert!(!manager.is_busy());
}

#[tokio::test]
async fn test_first_kit_add_creates_cart_then_batches_lines() {
    let components = r#"[{"title": "Deck", "handle": "deck", "quantity": 1, "variantId": "v-deck"}]"#;
    let kit_lines = vec![
        line("l1", "v-kit", 1, json!([])),
        line("l2", "v-deck", 1, json!([{"key": "BundleParent", "value": "v-kit"}])),
    ];
    let transport = ScriptedTransport::new()
        .reply(product(
            "starter-kit",
            "Starter Kit",
            json!([variant("v-kit", "Default Title", true)]),
            Some((components, "true")),
        ))
        .reply(payload("cartCreate", cart("c9", vec![])))
        .reply(payload("cartLinesAdd", cart("c9", kit_lines)));
    let (manager, transport, store) = manager(transport, None);

    let request = AddToCart::new("v-kit", 1).with_product_handle("starter-kit");
    let cart = manager.add_product_to_cart(request).await.unwrap();

    assert_eq!(cart.lines.len(), 2);
    assert_eq!(
        transport.operation_names(),
        ["ProductByHandle", "CartCreate", "CartLinesAdd"]
    );
    assert_eq!(persisted_id(&store), Some(CartId::new("c9")));
    let requests = transport.requests();
    assert_eq!(requests[2].variables["cartId"], "c9");
    assert_eq!(requests[2].variables["lines"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_rehydrate_cart_in_unlisted_currency() {
    let mut nzd = cart("c1", vec![line("l1", "v1", 1, json!([]))]);
    nzd["cost"] = json!({
        "subtotalAmount": {"amount": "39.90", "currencyCode": "NZD"},
        "totalAmount": {"amount": "45.89", "currencyCode": "NZD"}
    });
    nzd["lines"]["nodes"][0]["merchandise"]["price"] =
        json!({"amount": "39.90", "currencyCode": "NZD"});
    let transport = ScriptedTransport::new().reply(json!({"cart": nzd}));
    let (manager, _transport, _store) = manager(transport, Some("c1"));

    let cart = manager.rehydrate().await.unwrap().unwrap();

    assert_eq!(cart.cost.total_amount.amount_cents, 4589);
    assert_eq!(cart.cost.total_amount.currency.code(), "NZD");
    assert_eq!(manager.status(), CartStatus::Ready);
}

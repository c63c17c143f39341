//! Full storefront flow against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives the catalog, the
//! product list, and checkout orchestration over real HTTP with
//! `ReqwestFetch`. Validates that request building and response parsing
//! agree with the actual server, including its error bodies.

use std::sync::Arc;
use std::time::Duration;

use raia_core::{
    BrowseFilter, CheckoutOutcome, HttpClient, ProductCatalog, ProductFilters, ProductList,
    ReqwestFetch, ScreenState, Severity, Storefront, ToastChannel,
};

async fn start_server() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(mock_server::run(listener));
    format!("http://{addr}")
}

fn catalog(base_url: &str) -> ProductCatalog {
    ProductCatalog::new(HttpClient::new(base_url, Arc::new(ReqwestFetch::new())))
}

#[tokio::test]
async fn checkout_lifecycle() {
    let base_url = start_server().await;
    let store = Storefront::new(catalog(&base_url), ToastChannel::new(Duration::from_secs(4)));

    // Step 1: initial load.
    store.products().start().await;
    let state = store.products().snapshot();
    assert!(!state.loading);
    assert!(state.error.is_none());
    assert_eq!(state.products.len(), mock_server::seed().len());
    assert_eq!(
        ScreenState::derive(&state, &BrowseFilter::default()),
        ScreenState::Ready
    );

    // Step 2: ask for more than is in stock; the request is clamped.
    let loratadine = state
        .products
        .iter()
        .find(|p| p.name.starts_with("Loratadine"))
        .unwrap()
        .clone();
    assert_eq!(loratadine.stock, 5);
    let outcome = store.buy(&loratadine, 9).await;
    match outcome {
        CheckoutOutcome::Placed(response) => {
            assert_eq!(response.product.map(|p| p.stock), Some(0));
            assert!(response.order_id.is_some());
        }
        other => panic!("expected placed order, got {other:?}"),
    }
    let toast = store.toasts().current().unwrap();
    assert_eq!(toast.severity, Severity::Success);
    assert_eq!(toast.text, "Order placed successfully");

    // Step 3: the refetch brought the new stock level.
    let refreshed = store.products().find(&loratadine.id).unwrap();
    assert_eq!(refreshed.stock, 0);
    assert!(!store.can_buy(&refreshed));

    // Step 4: buying it again is rejected without a request.
    assert_eq!(store.buy(&refreshed, 1).await, CheckoutOutcome::OutOfStock);
    assert_eq!(
        store.toasts().current().map(|t| t.severity),
        Some(Severity::Error)
    );

    // Step 5: a stale copy still claims stock; the server refuses.
    let outcome = store.buy(&loratadine, 1).await;
    match outcome {
        CheckoutOutcome::Failed(err) => {
            assert_eq!(err.code, "409");
            assert_eq!(err.message, "Insufficient stock");
        }
        other => panic!("expected failure, got {other:?}"),
    }
    assert_eq!(
        store.toasts().current().map(|t| t.text),
        Some("Insufficient stock".to_string())
    );
}

#[tokio::test]
async fn server_side_filters() {
    let base_url = start_server().await;
    let catalog = catalog(&base_url);

    let filters = ProductFilters {
        category: Some("Pain Relief".to_string()),
        search: None,
    };
    let products = catalog.get_products(&filters).await.unwrap().unwrap();
    assert_eq!(products.len(), 2);

    let list = ProductList::with_filters(
        catalog.clone(),
        ProductFilters {
            category: None,
            search: Some("vitamin".to_string()),
        },
    );
    list.start().await;
    assert_eq!(list.products().len(), 1);
}

#[tokio::test]
async fn unknown_product_is_404() {
    let base_url = start_server().await;
    let err = catalog(&base_url)
        .checkout("does-not-exist", Some(1))
        .await
        .unwrap_err();
    assert_eq!(err.code, "404");
    assert_eq!(err.message, "Product not found");
}

#[tokio::test]
async fn unreachable_server_is_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let list = ProductList::new(catalog(&format!("http://{addr}")));
    list.start().await;

    let state = list.snapshot();
    assert!(!state.loading);
    assert!(state.error.is_some());
    assert!(state.products.is_empty());
    assert!(matches!(
        ScreenState::derive(&state, &BrowseFilter::default()),
        ScreenState::Failed(_)
    ));

    let err = catalog(&format!("http://{addr}"))
        .checkout("p1", None)
        .await
        .unwrap_err();
    assert!(err.is_network());
}

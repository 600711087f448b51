//! Integration tests for `ShopifyClient::fetch_all_orders`.
//!
//! Uses `wiremock` to stand up a local HTTP server for each test so no
//! real network traffic is made. Covers single-page, multi-page and stalled
//! cursor listings plus every error variant the listing can propagate.

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ordersync_shopify::{OrderQuery, ShopifyClient, ShopifyError};

/// Builds a client against the mock server with a small page size so
/// pagination is exercised with few fixtures.
fn test_client(server: &MockServer, page_limit: u32) -> ShopifyClient {
    ShopifyClient::with_base_url(&server.uri(), "shpat_test", 5, "ordersync-test/0.1", page_limit)
        .expect("failed to build test ShopifyClient")
}

fn query() -> OrderQuery<'static> {
    OrderQuery {
        status: "any",
        created_at_min: Some("2025-04-01T00:00:00Z"),
        created_at_max: Some("2025-07-01T00:00:00Z"),
    }
}

fn orders_json(ids: &[i64]) -> serde_json::Value {
    let orders: Vec<serde_json::Value> = ids
        .iter()
        .map(|id| {
            json!({
                "id": id,
                "created_at": "2025-06-15T10:00:00+02:00",
                "total_price": "10.00",
                "currency": "EUR",
                "line_items": []
            })
        })
        .collect();
    json!({ "orders": orders })
}

// ---------------------------------------------------------------------------
// Happy paths
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_all_orders_returns_empty_vec_when_shop_has_no_orders() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/orders.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "orders": [] })))
        .mount(&server)
        .await;

    let result = test_client(&server, 250).fetch_all_orders(&query()).await;

    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    assert!(result.unwrap().is_empty());
}

#[tokio::test]
async fn fetch_all_orders_sends_token_and_filters() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/orders.json"))
        .and(header("X-Shopify-Access-Token", "shpat_test"))
        .and(query_param("status", "any"))
        .and(query_param("created_at_min", "2025-04-01T00:00:00Z"))
        .and(query_param("created_at_max", "2025-07-01T00:00:00Z"))
        .and(query_param("since_id", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(orders_json(&[1])))
        .expect(1)
        .mount(&server)
        .await;

    let orders = test_client(&server, 250)
        .fetch_all_orders(&query())
        .await
        .expect("single page should succeed");

    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].id, 1);
}

#[tokio::test]
async fn fetch_all_orders_follows_since_id_across_pages() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/orders.json"))
        .and(query_param("since_id", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(orders_json(&[1, 2])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/orders.json"))
        .and(query_param("since_id", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(orders_json(&[3, 4])))
        .expect(1)
        .mount(&server)
        .await;

    // Short page ends the listing.
    Mock::given(method("GET"))
        .and(path("/orders.json"))
        .and(query_param("since_id", "4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(orders_json(&[5])))
        .expect(1)
        .mount(&server)
        .await;

    let orders = test_client(&server, 2)
        .fetch_all_orders(&query())
        .await
        .expect("multi-page listing should succeed");

    let ids: Vec<i64> = orders.iter().map(|o| o.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);
}

#[tokio::test]
async fn fetch_all_orders_stops_on_stalled_cursor() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/orders.json"))
        .and(query_param("since_id", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(orders_json(&[7, 9])))
        .expect(1)
        .mount(&server)
        .await;

    // A misbehaving API that ignores since_id and replays the same page.
    Mock::given(method("GET"))
        .and(path("/orders.json"))
        .and(query_param("since_id", "9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(orders_json(&[7, 9])))
        .expect(1)
        .mount(&server)
        .await;

    let orders = test_client(&server, 2)
        .fetch_all_orders(&query())
        .await
        .expect("stalled cursor should end the listing");

    assert_eq!(orders.len(), 4);
}

// ---------------------------------------------------------------------------
// Error propagation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_all_orders_propagates_rate_limit() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/orders.json"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "2.0"))
        .mount(&server)
        .await;

    let result = test_client(&server, 250).fetch_all_orders(&query()).await;

    match result.unwrap_err() {
        ShopifyError::RateLimited {
            retry_after_secs, ..
        } => assert_eq!(retry_after_secs, 2),
        other => panic!("expected ShopifyError::RateLimited, got: {other:?}"),
    }
}

#[tokio::test]
async fn fetch_all_orders_maps_rejected_token_to_unauthorized() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/orders.json"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = test_client(&server, 250).fetch_all_orders(&query()).await;

    assert!(
        matches!(
            result,
            Err(ShopifyError::Unauthorized { status: 401, .. })
        ),
        "expected Unauthorized, got: {result:?}"
    );
}

#[tokio::test]
async fn fetch_all_orders_propagates_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/orders.json"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let result = test_client(&server, 250).fetch_all_orders(&query()).await;

    match result.unwrap_err() {
        ShopifyError::UnexpectedStatus { status, .. } => assert_eq!(status, 503),
        other => panic!("expected ShopifyError::UnexpectedStatus, got: {other:?}"),
    }
}

#[tokio::test]
async fn fetch_all_orders_second_page_failure_discards_partial_results() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/orders.json"))
        .and(query_param("since_id", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(orders_json(&[1, 2])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/orders.json"))
        .and(query_param("since_id", "2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = test_client(&server, 2).fetch_all_orders(&query()).await;

    assert!(
        matches!(result, Err(ShopifyError::UnexpectedStatus { status: 500, .. })),
        "expected the page-2 failure, got: {result:?}"
    );
}

#[tokio::test]
async fn fetch_all_orders_reports_malformed_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/orders.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let result = test_client(&server, 250).fetch_all_orders(&query()).await;

    assert!(
        matches!(result, Err(ShopifyError::Deserialize { .. })),
        "expected Deserialize, got: {result:?}"
    );
}

use super::*;

fn any_query() -> OrderQuery<'static> {
    OrderQuery {
        status: "any",
        created_at_min: Some("2025-04-01T00:00:00Z"),
        created_at_max: None,
    }
}

#[test]
fn shop_host_expands_bare_handle() {
    assert_eq!(shop_host("maison"), "maison.myshopify.com");
}

#[test]
fn shop_host_keeps_full_host() {
    assert_eq!(shop_host("maison.myshopify.com"), "maison.myshopify.com");
    assert_eq!(
        shop_host("https://maison.myshopify.com/"),
        "maison.myshopify.com"
    );
}

#[test]
fn new_builds_admin_api_base() {
    let client = ShopifyClient::new("maison", "2025-07", "tok", 5, "test/0.1", 250).unwrap();
    assert_eq!(
        client.base_url.as_str(),
        "https://maison.myshopify.com/admin/api/2025-07/"
    );
    assert_eq!(client.shop, "maison.myshopify.com");
}

#[test]
fn orders_url_carries_filters_and_cursor() {
    let client = ShopifyClient::new("maison", "2025-07", "tok", 5, "test/0.1", 250).unwrap();
    let url = client.orders_url(&any_query(), 0).unwrap();
    assert_eq!(
        url.as_str(),
        "https://maison.myshopify.com/admin/api/2025-07/orders.json?status=any&created_at_min=2025-04-01T00%3A00%3A00Z&limit=250&since_id=0"
    );
}

#[test]
fn orders_url_includes_upper_bound_when_set() {
    let client = ShopifyClient::new("maison", "2025-07", "tok", 5, "test/0.1", 50).unwrap();
    let query = OrderQuery {
        status: "any",
        created_at_min: None,
        created_at_max: Some("2025-06-30T23:59:59Z"),
    };
    let url = client.orders_url(&query, 987).unwrap();
    let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    assert!(pairs.contains(&("created_at_max".into(), "2025-06-30T23:59:59Z".into())));
    assert!(pairs.contains(&("limit".into(), "50".into())));
    assert!(pairs.contains(&("since_id".into(), "987".into())));
    assert!(!pairs.iter().any(|(k, _)| k == "created_at_min"));
}

#[test]
fn with_base_url_rejects_invalid_url() {
    let result = ShopifyClient::with_base_url("not a url", "tok", 5, "test/0.1", 250);
    assert!(
        matches!(result, Err(ShopifyError::InvalidShopUrl { .. })),
        "expected InvalidShopUrl"
    );
}

#[test]
fn zero_page_limit_is_clamped() {
    let client = ShopifyClient::with_base_url("http://localhost:1", "tok", 5, "t", 0).unwrap();
    assert_eq!(client.page_limit, 1);
}

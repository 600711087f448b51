use ordersync_shopify::ShopifyOrder;
use serde_json::json;

pub(crate) fn order(id: i64, created_at: &str) -> ShopifyOrder {
    serde_json::from_value(json!({
        "id": id,
        "created_at": created_at,
        "total_price": "59.90",
        "total_line_items_price": "59.90",
        "total_discounts": "0.00",
        "total_tax": "9.98",
        "currency": "EUR",
        "email": format!("client{id}@example.com"),
        "line_items": [{
            "title": "Widget",
            "quantity": 2,
            "price": "29.95",
            "price_set": { "shop_money": { "currency_code": "EUR" } }
        }]
    }))
    .unwrap()
}

pub(crate) fn cells(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_owned()).collect()
}

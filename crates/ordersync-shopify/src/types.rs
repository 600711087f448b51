//! Shopify Admin API order types, shared by `orders.json` pages and the
//! `orders/create` webhook payload.
//!
//! ## Observed shape
//!
//! ### Money
//! Every amount is a decimal string (`"59.90"`), never a JSON number. Amounts
//! are passed through to the sheet untouched, so they stay `String`.
//!
//! ### Optional blocks
//! `customer`, `shipping_address` and `email` are `null` for POS and draft
//! orders. `total_shipping_price_set` is absent on orders created before
//! price sets existed.
//!
//! ### `created_at`
//! ISO-8601 with the shop's offset, e.g. `"2025-06-15T12:00:00+02:00"`. Kept as
//! a string here and parsed during normalization so that a bad value surfaces
//! as a malformed order rather than a whole-page decode failure.

use serde::Deserialize;

/// Top-level response from `GET /admin/api/{version}/orders.json`.
#[derive(Debug, Deserialize)]
pub struct ShopifyOrdersResponse {
    pub orders: Vec<ShopifyOrder>,
}

/// A single order as sent by Shopify.
#[derive(Debug, Clone, Deserialize)]
pub struct ShopifyOrder {
    /// Shopify numeric order ID; the sheet's order number.
    pub id: i64,

    #[serde(default)]
    pub created_at: Option<String>,

    #[serde(default)]
    pub total_price: Option<String>,

    /// Sum of line-item prices before discounts.
    #[serde(default)]
    pub total_line_items_price: Option<String>,

    #[serde(default)]
    pub total_discounts: Option<String>,

    #[serde(default)]
    pub total_tax: Option<String>,

    /// Order currency (ISO 4217).
    #[serde(default)]
    pub currency: Option<String>,

    /// Shipping total in shop and presentment currencies.
    #[serde(default)]
    pub total_shipping_price_set: Option<PriceSet>,

    #[serde(default)]
    pub customer: Option<ShopifyCustomer>,

    #[serde(default)]
    pub shipping_address: Option<ShopifyAddress>,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub line_items: Vec<ShopifyLineItem>,
}

/// An amount expressed in both shop and presentment currency.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PriceSet {
    #[serde(default)]
    pub shop_money: Option<Money>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Money {
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub currency_code: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShopifyCustomer {
    #[serde(default)]
    pub id: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShopifyAddress {
    #[serde(default)]
    pub address1: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShopifyLineItem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub quantity: i64,
    /// Unit price as a decimal string.
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub price_set: Option<PriceSet>,
}

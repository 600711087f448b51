//! Normalization from raw Shopify orders to [`ordersync_core::NormalizedRow`].
//!
//! Amounts are copied verbatim; only the creation timestamp is parsed, to
//! derive the order date and its month bucket.

use chrono::{DateTime, FixedOffset};
use ordersync_core::{parse_order_timestamp, MonthKey, NormalizedRow};

use crate::error::ShopifyError;
use crate::types::{PriceSet, ShopifyAddress, ShopifyLineItem, ShopifyOrder};

/// Parses the order's `created_at`.
///
/// # Errors
///
/// Returns [`ShopifyError::MalformedOrder`] if the timestamp is missing or is
/// not ISO-8601 with an offset.
pub fn order_created_at(order: &ShopifyOrder) -> Result<DateTime<FixedOffset>, ShopifyError> {
    let raw = order
        .created_at
        .as_deref()
        .ok_or_else(|| ShopifyError::MalformedOrder {
            order_id: order.id.to_string(),
            reason: "missing created_at".into(),
        })?;

    parse_order_timestamp(raw).map_err(|e| ShopifyError::MalformedOrder {
        order_id: order.id.to_string(),
        reason: e.to_string(),
    })
}

/// Month bucket the order belongs to.
///
/// # Errors
///
/// Same as [`order_created_at`].
pub fn order_month(order: &ShopifyOrder) -> Result<MonthKey, ShopifyError> {
    order_created_at(order).map(|ts| MonthKey::from_timestamp(&ts))
}

/// Normalizes a raw [`ShopifyOrder`] into a [`NormalizedRow`].
///
/// Missing customer, address and email become empty strings. Missing
/// shipping becomes `"0"`.
///
/// # Errors
///
/// Returns [`ShopifyError::MalformedOrder`] if `created_at` is missing or
/// unparseable.
pub fn normalize_order(order: &ShopifyOrder) -> Result<NormalizedRow, ShopifyError> {
    let created_at = order_created_at(order)?;
    let currency = order.currency.clone().unwrap_or_default();

    Ok(NormalizedRow {
        order_number: order.id.to_string(),
        order_date: created_at.format("%Y-%m-%d").to_string(),
        total: order.total_price.clone().unwrap_or_default(),
        product_total: order.total_line_items_price.clone().unwrap_or_default(),
        discounts: order.total_discounts.clone().unwrap_or_default(),
        shipping: shop_amount(order.total_shipping_price_set.as_ref())
            .unwrap_or("0")
            .to_owned(),
        taxes: order.total_tax.clone().unwrap_or_default(),
        customer_id: order
            .customer
            .as_ref()
            .and_then(|c| c.id)
            .map(|id| id.to_string())
            .unwrap_or_default(),
        shipping_address: order
            .shipping_address
            .as_ref()
            .map(format_address)
            .unwrap_or_default(),
        email: order.email.clone().unwrap_or_default(),
        products: order
            .line_items
            .iter()
            .map(|item| format_line_item(item, &currency))
            .collect::<Vec<_>>()
            .join("\n"),
        currency,
    })
}

fn shop_amount(set: Option<&PriceSet>) -> Option<&str> {
    set?.shop_money.as_ref()?.amount.as_deref()
}

/// `street, city, country`, keeping empty slots so the layout stays stable.
fn format_address(address: &ShopifyAddress) -> String {
    [&address.address1, &address.city, &address.country]
        .iter()
        .map(|part| part.as_deref().unwrap_or_default())
        .collect::<Vec<_>>()
        .join(", ")
}

/// `title(qtyxpriceCUR)`, e.g. `Widget(2x29.95EUR)`.
///
/// The item's shop-money currency wins; the order currency fills in when a
/// line item carries no price set.
fn format_line_item(item: &ShopifyLineItem, order_currency: &str) -> String {
    let currency = item
        .price_set
        .as_ref()
        .and_then(|set| set.shop_money.as_ref())
        .and_then(|money| money.currency_code.as_deref())
        .unwrap_or(order_currency);
    format!(
        "{}({}x{}{})",
        item.title,
        item.quantity,
        item.price.as_deref().unwrap_or_default(),
        currency
    )
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;

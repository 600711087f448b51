//! Order-side domain types: the flat spreadsheet row and the month bucket.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Header of the column holding the order number; the duplicate check keys on it.
pub const ORDER_NUMBER_COLUMN: &str = "N° commande";

/// One order flattened into the spreadsheet's column set.
///
/// Field order is the canonical column order written as the header of a
/// fresh sheet. Every row has exactly these columns, which is what lets a
/// row be aligned positionally to a header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedRow {
    pub order_number: String,
    /// Calendar date in the order's own UTC offset, `YYYY-MM-DD`.
    pub order_date: String,
    pub total: String,
    pub product_total: String,
    pub discounts: String,
    pub shipping: String,
    pub taxes: String,
    pub currency: String,
    pub customer_id: String,
    pub shipping_address: String,
    pub email: String,
    /// One `title(qtyxpriceCUR)` entry per line item, newline separated.
    pub products: String,
}

impl NormalizedRow {
    /// Column headers in canonical order.
    pub const COLUMNS: [&'static str; 12] = [
        ORDER_NUMBER_COLUMN,
        "Date de commande",
        "Total",
        "Total produit",
        "Promotions",
        "Frais de port",
        "Taxes",
        "Devise",
        "Client ID",
        "Adresse de livraison",
        "Email",
        "Produits",
    ];

    /// Header row for a sheet that has none yet.
    #[must_use]
    pub fn header() -> Vec<String> {
        Self::COLUMNS.iter().map(|c| (*c).to_owned()).collect()
    }

    /// Looks up the value for a column header. Unknown headers yield `None`.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&str> {
        let value = match column {
            ORDER_NUMBER_COLUMN => &self.order_number,
            "Date de commande" => &self.order_date,
            "Total" => &self.total,
            "Total produit" => &self.product_total,
            "Promotions" => &self.discounts,
            "Frais de port" => &self.shipping,
            "Taxes" => &self.taxes,
            "Devise" => &self.currency,
            "Client ID" => &self.customer_id,
            "Adresse de livraison" => &self.shipping_address,
            "Email" => &self.email,
            "Produits" => &self.products,
            _ => return None,
        };
        Some(value.as_str())
    }

    /// Values in canonical column order.
    #[must_use]
    pub fn values(&self) -> Vec<String> {
        Self::COLUMNS
            .iter()
            .map(|c| self.get(c).unwrap_or_default().to_owned())
            .collect()
    }

    /// Values placed under an existing header.
    ///
    /// Columns the row does not know are left blank; row fields the header
    /// does not name are dropped. The header is authoritative.
    #[must_use]
    pub fn aligned_to(&self, header: &[String]) -> Vec<String> {
        header
            .iter()
            .map(|column| self.get(column).unwrap_or_default().to_owned())
            .collect()
    }
}

/// Calendar month an order belongs to, formatted `YYYY-MM`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MonthKey(String);

impl MonthKey {
    #[must_use]
    pub fn from_timestamp(created_at: &DateTime<FixedOffset>) -> Self {
        Self(created_at.format("%Y-%m").to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Display name of the spreadsheet holding this month's orders.
    #[must_use]
    pub fn sheet_name(&self) -> String {
        format!("Commandes {}", self.0)
    }
}

impl std::str::FromStr for MonthKey {
    type Err = CoreError;

    /// Parses a `YYYY-MM` key.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let valid = s.len() == 7
            && s.is_ascii()
            && s.as_bytes()[4] == b'-'
            && s.bytes().enumerate().all(|(i, b)| i == 4 || b.is_ascii_digit())
            && s[5..].parse::<u32>().is_ok_and(|m| (1..=12).contains(&m));
        if valid {
            Ok(Self(s.to_owned()))
        } else {
            Err(CoreError::InvalidMonth(s.to_owned()))
        }
    }
}

impl std::fmt::Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parses an order `created_at` timestamp. An explicit UTC offset is required.
///
/// Shopify emits RFC 3339 (`2025-06-15T12:00:00+02:00`); the compact
/// `+0200` offset form is accepted as well.
///
/// # Errors
///
/// Returns [`CoreError::InvalidTimestamp`] when the value is not an ISO-8601
/// timestamp carrying an offset.
pub fn parse_order_timestamp(value: &str) -> Result<DateTime<FixedOffset>, CoreError> {
    let trimmed = value.trim();
    DateTime::parse_from_rfc3339(trimmed)
        .or_else(|_| DateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%z"))
        .or_else(|_| DateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f%z"))
        .map_err(|e| CoreError::InvalidTimestamp {
            value: value.to_owned(),
            reason: e.to_string(),
        })
}

//! HTTP client for the Shopify Admin API `orders.json` endpoint.

mod fetch_all;

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::ShopifyError;
use crate::pagination::OrderPage;
use crate::types::ShopifyOrdersResponse;

/// Maximum number of pages to fetch before returning an error.
/// Prevents unbounded loops if the API keeps returning full pages.
pub(super) const MAX_PAGES: usize = 400;

/// Filters for an order listing.
#[derive(Debug, Clone)]
pub struct OrderQuery<'a> {
    /// Shopify order status filter: `any`, `open`, `closed` or `cancelled`.
    pub status: &'a str,
    /// Lower bound on `created_at` (inclusive, ISO-8601).
    pub created_at_min: Option<&'a str>,
    /// Upper bound on `created_at` (inclusive, ISO-8601).
    pub created_at_max: Option<&'a str>,
}

/// HTTP client for a single shop's Admin API.
///
/// Non-2xx responses are surfaced as typed errors; nothing is retried. A
/// failed page aborts the whole listing.
pub struct ShopifyClient {
    pub(super) client: Client,
    /// Always ends with `/`, e.g. `https://shop.myshopify.com/admin/api/2025-07/`.
    pub(super) base_url: Url,
    pub(super) shop: String,
    api_token: String,
    pub(super) page_limit: u32,
}

impl ShopifyClient {
    /// Creates a client for `merchant` (a shop handle such as `maison` or a
    /// full `maison.myshopify.com` host) on the given API version.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ShopifyError::InvalidShopUrl`] if the
    /// merchant does not form a valid URL.
    pub fn new(
        merchant: &str,
        api_version: &str,
        api_token: &str,
        timeout_secs: u64,
        user_agent: &str,
        page_limit: u32,
    ) -> Result<Self, ShopifyError> {
        let host = shop_host(merchant);
        let base = format!("https://{host}/admin/api/{api_version}/");
        Self::with_base_url(&base, api_token, timeout_secs, user_agent, page_limit)
    }

    /// Creates a client with a custom API base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ShopifyError::InvalidShopUrl`] if
    /// `base_url` is not a valid URL.
    pub fn with_base_url(
        base_url: &str,
        api_token: &str,
        timeout_secs: u64,
        user_agent: &str,
        page_limit: u32,
    ) -> Result<Self, ShopifyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so `join` appends rather than replaces
        // the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| ShopifyError::InvalidShopUrl {
            shop_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        let shop = base_url.host_str().unwrap_or("shopify").to_owned();

        Ok(Self {
            client,
            base_url,
            shop,
            api_token: api_token.to_owned(),
            page_limit: page_limit.max(1),
        })
    }

    /// Fetches one page of orders strictly after `since_id`.
    ///
    /// # Errors
    ///
    /// - [`ShopifyError::Unauthorized`] on HTTP 401/403.
    /// - [`ShopifyError::RateLimited`] on HTTP 429.
    /// - [`ShopifyError::NotFound`] on HTTP 404.
    /// - [`ShopifyError::UnexpectedStatus`] for any other non-2xx status.
    /// - [`ShopifyError::Http`] on network or TLS failure.
    /// - [`ShopifyError::Deserialize`] if the body is not an orders page.
    pub async fn fetch_orders_page(
        &self,
        query: &OrderQuery<'_>,
        since_id: i64,
    ) -> Result<OrderPage, ShopifyError> {
        let url = self.orders_url(query, since_id)?;
        tracing::debug!(shop = %self.shop, since_id, "fetching orders page");

        let response = self
            .client
            .get(url.clone())
            .header("X-Shopify-Access-Token", &self.api_token)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                // Shopify sends fractional seconds ("2.0").
                .and_then(|s| s.split('.').next()?.parse::<u64>().ok())
                .unwrap_or(2);
            return Err(ShopifyError::RateLimited {
                shop: self.shop.clone(),
                retry_after_secs,
            });
        }

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(ShopifyError::Unauthorized {
                shop: self.shop.clone(),
                status: status.as_u16(),
            });
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ShopifyError::NotFound {
                url: url.to_string(),
            });
        }

        if !status.is_success() {
            return Err(ShopifyError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        let parsed = serde_json::from_str::<ShopifyOrdersResponse>(&body).map_err(|e| {
            ShopifyError::Deserialize {
                context: format!("orders page from {} (since_id={since_id})", self.shop),
                source: e,
            }
        })?;

        Ok(OrderPage::classify(
            parsed.orders,
            self.page_limit,
            since_id,
        ))
    }

    /// Builds the `orders.json` URL for the given filters and cursor.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::InvalidShopUrl`] if the endpoint cannot be
    /// joined onto the base URL.
    fn orders_url(&self, query: &OrderQuery<'_>, since_id: i64) -> Result<Url, ShopifyError> {
        let mut url = self
            .base_url
            .join("orders.json")
            .map_err(|e| ShopifyError::InvalidShopUrl {
                shop_url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;

        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("status", query.status);
            if let Some(min) = query.created_at_min {
                pairs.append_pair("created_at_min", min);
            }
            if let Some(max) = query.created_at_max {
                pairs.append_pair("created_at_max", max);
            }
            pairs.append_pair("limit", &self.page_limit.to_string());
            pairs.append_pair("since_id", &since_id.to_string());
        }

        Ok(url)
    }
}

/// Expands a bare shop handle into its `myshopify.com` host.
fn shop_host(merchant: &str) -> String {
    let trimmed = merchant
        .trim()
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_end_matches('/');
    if trimmed.contains('.') {
        trimmed.to_owned()
    } else {
        format!("{trimmed}.myshopify.com")
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;

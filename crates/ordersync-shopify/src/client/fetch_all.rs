//! Multi-page order fetch loop for `ShopifyClient`.

use crate::error::ShopifyError;
use crate::pagination::OrderPage;
use crate::types::ShopifyOrder;

use super::OrderQuery;
use super::ShopifyClient;
use super::MAX_PAGES;

impl ShopifyClient {
    /// Fetches every order matching `query` by walking `since_id` pages.
    ///
    /// **All-or-nothing semantics**: if any page fails, the orders already
    /// collected are discarded and the error is returned. A partial listing
    /// would make a reset silently drop months.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Self::fetch_orders_page`].
    /// Returns [`ShopifyError::PaginationLimit`] if the number of pages exceeds
    /// [`MAX_PAGES`].
    pub async fn fetch_all_orders(
        &self,
        query: &OrderQuery<'_>,
    ) -> Result<Vec<ShopifyOrder>, ShopifyError> {
        let mut all_orders: Vec<ShopifyOrder> = Vec::new();
        let mut since_id = 0_i64;

        for _ in 0..MAX_PAGES {
            match self.fetch_orders_page(query, since_id).await? {
                OrderPage::More {
                    orders,
                    next_since_id,
                } => {
                    all_orders.extend(orders);
                    since_id = next_since_id;
                }
                OrderPage::End { orders } => {
                    all_orders.extend(orders);
                    tracing::info!(
                        shop = %self.shop,
                        count = all_orders.len(),
                        "fetched all orders"
                    );
                    return Ok(all_orders);
                }
            }
        }

        Err(ShopifyError::PaginationLimit {
            shop: self.shop.clone(),
            max_pages: MAX_PAGES,
        })
    }
}

//! `since_id` cursor pagination for the Admin API `orders.json` endpoint.
//!
//! Orders come back sorted by ascending ID when `since_id` is set, so the ID
//! of the last order on a page is the cursor for the next one. A page is the
//! last one when:
//!
//! - it holds fewer orders than the requested `limit`, or
//! - its last ID does not advance past the cursor that produced it (a stalled
//!   cursor, which would otherwise loop forever).

use crate::types::ShopifyOrder;

/// One classified page of orders.
#[derive(Debug)]
pub enum OrderPage {
    /// A full page; request the next one with `since_id = next_since_id`.
    More {
        orders: Vec<ShopifyOrder>,
        next_since_id: i64,
    },
    /// The final page. May be empty.
    End { orders: Vec<ShopifyOrder> },
}

impl OrderPage {
    /// Classifies a fetched page given the request's `limit` and `since_id`.
    #[must_use]
    pub fn classify(orders: Vec<ShopifyOrder>, limit: u32, since_id: i64) -> Self {
        let short = orders.len() < limit as usize;
        match orders.last().map(|o| o.id) {
            Some(last_id) if !short && last_id > since_id => Self::More {
                orders,
                next_since_id: last_id,
            },
            _ => Self::End { orders },
        }
    }

    #[must_use]
    pub fn into_orders(self) -> Vec<ShopifyOrder> {
        match self {
            Self::More { orders, .. } | Self::End { orders } => orders,
        }
    }
}

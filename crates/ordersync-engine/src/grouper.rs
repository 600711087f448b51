//! Buckets orders by the calendar month of their creation timestamp.

use std::collections::BTreeMap;

use ordersync_core::{InvalidTimestampPolicy, MonthKey};
use ordersync_shopify::{order_month, ShopifyOrder};

use crate::error::SyncError;

/// Orders grouped by month, months in ascending order.
#[derive(Debug, Default)]
pub struct MonthlyGroups {
    pub months: BTreeMap<MonthKey, Vec<ShopifyOrder>>,
    /// IDs of orders dropped under [`InvalidTimestampPolicy::Skip`].
    pub skipped: Vec<i64>,
}

impl MonthlyGroups {
    #[must_use]
    pub fn order_count(&self) -> usize {
        self.months.values().map(Vec::len).sum()
    }
}

/// Groups `orders` by creation month. Within a month, input order is kept.
///
/// # Errors
///
/// Under [`InvalidTimestampPolicy::Abort`], returns
/// [`SyncError::MalformedInput`] for the first order whose `created_at` is
/// missing or unparseable.
pub fn group_by_month(
    orders: Vec<ShopifyOrder>,
    policy: InvalidTimestampPolicy,
) -> Result<MonthlyGroups, SyncError> {
    let mut groups = MonthlyGroups::default();

    for order in orders {
        match order_month(&order) {
            Ok(month) => groups.months.entry(month).or_default().push(order),
            Err(e) => match policy {
                InvalidTimestampPolicy::Abort => {
                    return Err(SyncError::MalformedInput(e.to_string()));
                }
                InvalidTimestampPolicy::Skip => {
                    tracing::warn!(order_id = order.id, error = %e, "skipping order with bad timestamp");
                    groups.skipped.push(order.id);
                }
            },
        }
    }

    Ok(groups)
}

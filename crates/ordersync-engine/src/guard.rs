//! Duplicate check before a single-order append.
//!
//! A linear scan of the order-number column over the layout's bounded scan
//! range. Best effort only: a concurrent push of the same order can pass
//! the check twice.

use ordersync_core::{SheetContents, SpreadsheetRef, ORDER_NUMBER_COLUMN};

use crate::error::CollaboratorError;
use crate::layout::SheetLayout;
use crate::ports::DocumentStore;

/// `true` if a data row of `contents` carries `order_number` (exact match).
///
/// A sheet whose header has no order-number column never matches.
#[must_use]
pub fn contains_order(contents: &SheetContents, order_number: &str) -> bool {
    if contents.column_index(ORDER_NUMBER_COLUMN).is_none() {
        if !contents.is_empty() {
            tracing::warn!(
                column = ORDER_NUMBER_COLUMN,
                "sheet header has no order number column; duplicate check skipped"
            );
        }
        return false;
    }
    contents
        .column_values(ORDER_NUMBER_COLUMN)
        .any(|value| value == order_number)
}

/// Reads the sheet and checks it for `order_number`.
///
/// # Errors
///
/// Propagates the read failure.
pub async fn is_duplicate(
    store: &dyn DocumentStore,
    layout: &SheetLayout,
    sheet: &SpreadsheetRef,
    order_number: &str,
) -> Result<bool, CollaboratorError> {
    let contents = store.read_range(&sheet.id, &layout.scan_range()).await?;
    Ok(contains_order(&contents, order_number))
}

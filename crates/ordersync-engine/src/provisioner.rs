//! Finds or creates the spreadsheet for a month.
//!
//! Lookup is by exact display name inside the folder. The list-then-create
//! sequence is not atomic: two callers racing on a new month can both
//! create a sheet. When that has happened, the first match in listing order
//! is used.

use ordersync_core::{MonthKey, SpreadsheetRef};

use crate::error::CollaboratorError;
use crate::ports::DocumentStore;

/// The month's spreadsheet in `folder_id`, if one exists.
///
/// # Errors
///
/// Propagates the folder listing failure.
pub async fn find_sheet(
    store: &dyn DocumentStore,
    folder_id: &str,
    month: &MonthKey,
) -> Result<Option<SpreadsheetRef>, CollaboratorError> {
    let name = month.sheet_name();
    let files = store.list_files(folder_id, None).await?;
    let mut matches = files.into_iter().filter(|f| f.name == name);

    let found = matches.next().map(SpreadsheetRef::from);
    if let Some(sheet) = &found {
        let extra = matches.count();
        if extra > 0 {
            tracing::warn!(%month, sheet_id = %sheet.id, extra, "duplicate monthly sheets in folder");
        }
    }
    Ok(found)
}

/// Creates the month's spreadsheet in `folder_id`.
///
/// # Errors
///
/// Propagates the creation failure.
pub async fn create_sheet(
    store: &dyn DocumentStore,
    folder_id: &str,
    month: &MonthKey,
) -> Result<SpreadsheetRef, CollaboratorError> {
    let sheet = store
        .create_spreadsheet(&month.sheet_name(), folder_id)
        .await?;
    tracing::info!(%month, sheet_id = %sheet.id, folder_id, "created monthly sheet");
    Ok(sheet)
}

/// Returns the month's spreadsheet, creating it if the folder has none.
///
/// # Errors
///
/// Propagates listing or creation failures.
pub async fn ensure_sheet(
    store: &dyn DocumentStore,
    folder_id: &str,
    month: &MonthKey,
) -> Result<SpreadsheetRef, CollaboratorError> {
    match find_sheet(store, folder_id, month).await? {
        Some(sheet) => Ok(sheet),
        None => create_sheet(store, folder_id, month).await,
    }
}

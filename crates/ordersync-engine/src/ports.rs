//! Collaborator ports consumed by the orchestrators.
//!
//! The orchestrators never talk to Shopify or Google directly; they receive
//! an [`OrderSource`] and a [`DocumentStore`] at construction. Production
//! wiring uses the adapters in [`crate::adapters`]; tests substitute
//! in-memory implementations.

use async_trait::async_trait;
use ordersync_core::{DriveFile, SheetContents, SpreadsheetRef};
use ordersync_shopify::ShopifyOrder;

use crate::error::CollaboratorError;

/// Time window and status filter for an order listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderWindow {
    pub status: String,
    /// Inclusive lower bound on creation time, RFC 3339.
    pub start: Option<String>,
    /// Inclusive upper bound on creation time, RFC 3339.
    pub end: Option<String>,
}

/// The commerce platform: a complete order listing for a window.
///
/// Pagination is internal to the implementation; callers get every order
/// or an error, never a partial listing.
#[async_trait]
pub trait OrderSource: Send + Sync {
    async fn fetch_orders(&self, window: &OrderWindow)
        -> Result<Vec<ShopifyOrder>, CollaboratorError>;
}

/// The document store: a drive folder of spreadsheets and their cell values.
///
/// Ranges are A1 notation including the tab name.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Files directly inside `folder_id`, optionally only those modified
    /// after `modified_since`.
    async fn list_files(
        &self,
        folder_id: &str,
        modified_since: Option<&str>,
    ) -> Result<Vec<DriveFile>, CollaboratorError>;

    async fn create_folder(
        &self,
        name: &str,
        parent: Option<&str>,
    ) -> Result<DriveFile, CollaboratorError>;

    async fn delete_file(&self, file_id: &str) -> Result<(), CollaboratorError>;

    async fn create_spreadsheet(
        &self,
        name: &str,
        folder_id: &str,
    ) -> Result<SpreadsheetRef, CollaboratorError>;

    async fn read_range(
        &self,
        spreadsheet_id: &str,
        range: &str,
    ) -> Result<SheetContents, CollaboratorError>;

    /// Appends rows after the last non-empty row of the table at `range`.
    async fn append_rows(
        &self,
        spreadsheet_id: &str,
        range: &str,
        rows: &[Vec<String>],
    ) -> Result<(), CollaboratorError>;

    /// Writes rows starting at the top-left cell of `range`.
    async fn update_range(
        &self,
        spreadsheet_id: &str,
        range: &str,
        rows: &[Vec<String>],
    ) -> Result<(), CollaboratorError>;

    async fn clear_range(&self, spreadsheet_id: &str, range: &str)
        -> Result<(), CollaboratorError>;
}

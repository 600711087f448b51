//! Single-order append from an order webhook.

use std::sync::Arc;

use ordersync_core::{MonthKey, SpreadsheetRef};
use ordersync_shopify::{normalize_order, order_month, ShopifyOrder};
use serde::Serialize;

use crate::error::{CollaboratorError, Phase, SyncError};
use crate::guard::contains_order;
use crate::ports::DocumentStore;
use crate::provisioner::{create_sheet, find_sheet};
use crate::settings::SyncSettings;
use crate::writer::SheetWriter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PushAction {
    /// The month had no sheet; it was created with header and row.
    CreatedSheet,
    /// The sheet existed but was empty; header and row were written.
    WroteHeader,
    Appended,
    /// The order number was already present; nothing was written.
    Duplicate,
}

#[derive(Debug, Clone, Serialize)]
pub struct PushReport {
    pub order_number: String,
    pub month: MonthKey,
    pub sheet: SpreadsheetRef,
    pub action: PushAction,
}

pub struct PushOrchestrator {
    store: Arc<dyn DocumentStore>,
    settings: Arc<SyncSettings>,
}

impl PushOrchestrator {
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>, settings: Arc<SyncSettings>) -> Self {
        Self { store, settings }
    }

    /// Checks the shop domain a request declares.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Unauthorized`] if it is missing or not the
    /// accepted shop.
    pub fn authorize(&self, source_domain: Option<&str>) -> Result<(), SyncError> {
        if source_domain.is_some_and(|d| self.settings.source_is_trusted(d)) {
            return Ok(());
        }
        tracing::warn!(source_domain = ?source_domain, "push rejected: untrusted source");
        Err(SyncError::Unauthorized("untrusted order source"))
    }

    /// Records one order in its month's sheet unless it is already there.
    ///
    /// # Errors
    ///
    /// - [`SyncError::Unauthorized`] if `source_domain` is missing or not
    ///   the accepted shop.
    /// - [`SyncError::MalformedInput`] if the order has no parseable
    ///   creation timestamp.
    /// - [`SyncError::OperationFailed`] naming the month when a store call fails.
    pub async fn run(
        &self,
        source_domain: Option<&str>,
        order: &ShopifyOrder,
    ) -> Result<PushReport, SyncError> {
        self.authorize(source_domain)?;

        let row = normalize_order(order).map_err(|e| SyncError::MalformedInput(e.to_string()))?;
        let month = order_month(order).map_err(|e| SyncError::MalformedInput(e.to_string()))?;
        let order_number = row.order_number.clone();
        tracing::info!(%order_number, %month, "push received");

        let store = self.store.as_ref();
        let folder_id = self.settings.folder_id.as_str();
        let layout = &self.settings.layout;
        let writer = SheetWriter::new(store, layout);
        let fail = |phase: Phase| {
            let month = month.clone();
            move |e: CollaboratorError| {
                tracing::error!(%month, %phase, error = %e, "push failed");
                SyncError::failed(phase, Some(&month), e)
            }
        };

        let existing = find_sheet(store, folder_id, &month)
            .await
            .map_err(fail(Phase::Locating))?;

        let (sheet, action) = match existing {
            None => {
                let sheet = create_sheet(store, folder_id, &month)
                    .await
                    .map_err(fail(Phase::Provisioning))?;
                writer
                    .write_header_and_row(&sheet, &row)
                    .await
                    .map_err(fail(Phase::Writing))?;
                (sheet, PushAction::CreatedSheet)
            }
            Some(sheet) => {
                let contents = store
                    .read_range(&sheet.id, &layout.scan_range())
                    .await
                    .map_err(fail(Phase::Reading))?;

                if contents.is_empty() {
                    writer
                        .write_header_and_row(&sheet, &row)
                        .await
                        .map_err(fail(Phase::Writing))?;
                    (sheet, PushAction::WroteHeader)
                } else if contains_order(&contents, &order_number) {
                    tracing::info!(%order_number, sheet_id = %sheet.id, "order already present");
                    (sheet, PushAction::Duplicate)
                } else {
                    writer
                        .append_row(&sheet, &row, &contents.header)
                        .await
                        .map_err(fail(Phase::Writing))?;
                    (sheet, PushAction::Appended)
                }
            }
        };

        Ok(PushReport {
            order_number,
            month,
            sheet,
            action,
        })
    }
}

#[cfg(test)]
#[path = "push_test.rs"]
mod tests;

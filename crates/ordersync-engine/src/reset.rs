//! Full rebuild of the monthly spreadsheets from the order source.
//!
//! Runs authorize, fetch, empty folder, group, then provision and bulk
//! write one sheet per month, in that order. Emptying the folder is
//! destructive and nothing is rolled back: a failure after it leaves the
//! folder partially rebuilt. A failing month does not stop the others; the
//! run reports every failed month at the end.

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use ordersync_core::{parse_order_timestamp, MonthKey, NormalizedRow};
use ordersync_shopify::{normalize_order, ShopifyOrder};
use serde::Serialize;

use crate::error::{CollaboratorError, Phase, SyncError};
use crate::grouper::group_by_month;
use crate::ports::{DocumentStore, OrderSource, OrderWindow};
use crate::provisioner::ensure_sheet;
use crate::settings::SyncSettings;
use crate::writer::SheetWriter;

/// Orders of every status are rebuilt.
const ORDER_STATUS: &str = "any";

#[derive(Debug, Clone, Default)]
pub struct ResetRequest {
    pub secret: String,
    /// RFC 3339; defaults to the configured start.
    pub start: Option<String>,
    /// RFC 3339; defaults to now.
    pub end: Option<String>,
    /// Fetch and group only. The folder is left untouched.
    pub simulate: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthReport {
    pub month: MonthKey,
    pub sheet_name: String,
    /// Absent when simulated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheet_id: Option<String>,
    pub rows: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResetSummary {
    pub simulated: bool,
    pub window_start: String,
    pub window_end: String,
    pub orders_fetched: usize,
    pub orders_skipped: usize,
    pub files_deleted: usize,
    pub months: Vec<MonthReport>,
}

struct MonthFailure {
    month: MonthKey,
    phase: Phase,
    error: CollaboratorError,
}

pub struct ResetOrchestrator {
    source: Arc<dyn OrderSource>,
    store: Arc<dyn DocumentStore>,
    settings: Arc<SyncSettings>,
}

impl ResetOrchestrator {
    #[must_use]
    pub fn new(
        source: Arc<dyn OrderSource>,
        store: Arc<dyn DocumentStore>,
        settings: Arc<SyncSettings>,
    ) -> Self {
        Self {
            source,
            store,
            settings,
        }
    }

    /// Runs a reset.
    ///
    /// # Errors
    ///
    /// - [`SyncError::Unauthorized`] if the secret does not match.
    /// - [`SyncError::MalformedInput`] for a bad window or, under the abort
    ///   policy, an order with an unparseable timestamp.
    /// - [`SyncError::OperationFailed`] naming the phase, and the months for
    ///   per-month failures.
    pub async fn run(&self, request: ResetRequest) -> Result<ResetSummary, SyncError> {
        if !self.settings.reset_secret_matches(&request.secret) {
            tracing::warn!("reset rejected: bad secret");
            return Err(SyncError::Unauthorized("invalid reset secret"));
        }

        let window = self.window(&request)?;
        tracing::info!(
            start = ?window.start,
            end = ?window.end,
            simulate = request.simulate,
            "reset started"
        );

        let orders = self.source.fetch_orders(&window).await.map_err(|e| {
            tracing::error!(error = %e, "reset: order fetch failed");
            SyncError::failed(Phase::Fetching, None, e)
        })?;
        let orders_fetched = orders.len();

        let files_deleted = if request.simulate {
            0
        } else {
            self.empty_folder().await?
        };

        let groups = group_by_month(orders, self.settings.timestamp_policy)?;
        let orders_skipped = groups.skipped.len();

        let mut months = Vec::with_capacity(groups.months.len());
        let mut failures = Vec::new();
        for (month, orders) in groups.months {
            if request.simulate {
                months.push(MonthReport {
                    sheet_name: month.sheet_name(),
                    month,
                    sheet_id: None,
                    rows: orders.len(),
                });
                continue;
            }
            match self.write_month(&month, &orders).await {
                Ok(report) => months.push(report),
                Err((phase, error)) => {
                    tracing::error!(%month, %phase, error = %error, "reset: month failed");
                    failures.push(MonthFailure {
                        month,
                        phase,
                        error,
                    });
                }
            }
        }

        if !failures.is_empty() {
            return Err(aggregate(failures));
        }

        let summary = ResetSummary {
            simulated: request.simulate,
            window_start: window.start.unwrap_or_default(),
            window_end: window.end.unwrap_or_default(),
            orders_fetched,
            orders_skipped,
            files_deleted,
            months,
        };
        tracing::info!(
            orders = summary.orders_fetched,
            months = summary.months.len(),
            deleted = summary.files_deleted,
            simulated = summary.simulated,
            "reset finished"
        );
        Ok(summary)
    }

    /// Validates and fills in the request window.
    fn window(&self, request: &ResetRequest) -> Result<OrderWindow, SyncError> {
        let start = request
            .start
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(&self.settings.default_start);
        let start = parse_order_timestamp(start)
            .map_err(|e| SyncError::MalformedInput(format!("window start: {e}")))?;

        let end = match request.end.as_deref().filter(|s| !s.trim().is_empty()) {
            Some(end) => parse_order_timestamp(end)
                .map_err(|e| SyncError::MalformedInput(format!("window end: {e}")))?,
            None => Utc::now().fixed_offset(),
        };

        if start > end {
            return Err(SyncError::MalformedInput(format!(
                "window start {start} is after end {end}"
            )));
        }

        Ok(OrderWindow {
            status: ORDER_STATUS.to_owned(),
            start: Some(start.to_rfc3339_opts(SecondsFormat::Secs, true)),
            end: Some(end.to_rfc3339_opts(SecondsFormat::Secs, true)),
        })
    }

    /// Deletes every file in the folder. Stops at the first failure.
    async fn empty_folder(&self) -> Result<usize, SyncError> {
        let folder_id = self.settings.folder_id.as_str();
        let emptying_failed = |e: CollaboratorError| {
            tracing::error!(folder_id, error = %e, "reset: emptying folder failed");
            SyncError::failed(Phase::Emptying, None, e)
        };

        let files = self
            .store
            .list_files(folder_id, None)
            .await
            .map_err(emptying_failed)?;
        for file in &files {
            self.store
                .delete_file(&file.id)
                .await
                .map_err(emptying_failed)?;
            tracing::debug!(file_id = %file.id, name = %file.name, "deleted");
        }
        tracing::info!(folder_id, deleted = files.len(), "folder emptied");
        Ok(files.len())
    }

    async fn write_month(
        &self,
        month: &MonthKey,
        orders: &[ShopifyOrder],
    ) -> Result<MonthReport, (Phase, CollaboratorError)> {
        let rows = orders
            .iter()
            .map(normalize_order)
            .collect::<Result<Vec<NormalizedRow>, _>>()
            .map_err(|e| (Phase::Writing, CollaboratorError::from(e)))?;

        let sheet = ensure_sheet(self.store.as_ref(), &self.settings.folder_id, month)
            .await
            .map_err(|e| (Phase::Provisioning, e))?;

        SheetWriter::new(self.store.as_ref(), &self.settings.layout)
            .write_bulk(&sheet, &rows)
            .await
            .map_err(|e| (Phase::Writing, e))?;

        tracing::info!(%month, sheet_id = %sheet.id, rows = rows.len(), "month written");
        Ok(MonthReport {
            month: month.clone(),
            sheet_name: sheet.name,
            sheet_id: Some(sheet.id),
            rows: rows.len(),
        })
    }
}

fn aggregate(mut failures: Vec<MonthFailure>) -> SyncError {
    if failures.len() == 1 {
        let failure = failures.remove(0);
        return SyncError::failed(failure.phase, Some(&failure.month), failure.error);
    }
    SyncError::OperationFailed {
        phase: failures[0].phase,
        months: failures.into_iter().map(|f| f.month).collect(),
        source: None,
    }
}

#[cfg(test)]
#[path = "reset_test.rs"]
mod tests;

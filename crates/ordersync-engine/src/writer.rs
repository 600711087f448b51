//! Writes normalized rows into a monthly spreadsheet.
//!
//! A sheet's header, once written, decides the column order of every later
//! append. Rows are placed under it by column name, never by position.

use ordersync_core::{NormalizedRow, SpreadsheetRef};

use crate::error::CollaboratorError;
use crate::layout::SheetLayout;
use crate::ports::DocumentStore;

/// Cell text as written: carriage returns become spaces.
fn sanitize(cell: &str) -> String {
    cell.replace('\r', " ")
}

fn sanitize_row(row: Vec<String>) -> Vec<String> {
    row.into_iter().map(|cell| sanitize(&cell)).collect()
}

pub struct SheetWriter<'a> {
    store: &'a dyn DocumentStore,
    layout: &'a SheetLayout,
}

impl<'a> SheetWriter<'a> {
    #[must_use]
    pub fn new(store: &'a dyn DocumentStore, layout: &'a SheetLayout) -> Self {
        Self { store, layout }
    }

    /// First write to an empty sheet: the canonical header, then the row.
    /// One append call, so exactly two rows land.
    ///
    /// # Errors
    ///
    /// Propagates the append failure.
    pub async fn write_header_and_row(
        &self,
        sheet: &SpreadsheetRef,
        row: &NormalizedRow,
    ) -> Result<(), CollaboratorError> {
        let rows = vec![NormalizedRow::header(), sanitize_row(row.values())];
        self.store
            .append_rows(&sheet.id, &self.layout.anchor(), &rows)
            .await?;
        tracing::info!(sheet_id = %sheet.id, order_number = %row.order_number, "wrote header and first row");
        Ok(())
    }

    /// Appends `row` aligned to an existing `header`.
    ///
    /// # Errors
    ///
    /// Propagates the append failure.
    pub async fn append_row(
        &self,
        sheet: &SpreadsheetRef,
        row: &NormalizedRow,
        header: &[String],
    ) -> Result<(), CollaboratorError> {
        let rows = vec![sanitize_row(row.aligned_to(header))];
        self.store
            .append_rows(&sheet.id, &self.layout.anchor(), &rows)
            .await?;
        tracing::info!(sheet_id = %sheet.id, order_number = %row.order_number, "appended row");
        Ok(())
    }

    /// Replaces the tab's content with the canonical header and `rows`.
    ///
    /// # Errors
    ///
    /// Propagates clear or update failures. A failed update leaves the tab
    /// cleared.
    pub async fn write_bulk(
        &self,
        sheet: &SpreadsheetRef,
        rows: &[NormalizedRow],
    ) -> Result<(), CollaboratorError> {
        let mut grid = Vec::with_capacity(rows.len() + 1);
        grid.push(NormalizedRow::header());
        grid.extend(rows.iter().map(|row| sanitize_row(row.values())));

        self.store
            .clear_range(&sheet.id, &self.layout.whole_tab())
            .await?;
        self.store
            .update_range(&sheet.id, &self.layout.anchor(), &grid)
            .await?;
        tracing::info!(sheet_id = %sheet.id, rows = rows.len(), "bulk wrote sheet");
        Ok(())
    }
}

#[cfg(test)]
#[path = "writer_test.rs"]
mod tests;

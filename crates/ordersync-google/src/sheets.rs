//! Sheets v4 `values` endpoints.
//!
//! Ranges use A1 notation including the tab, e.g. `Sheet1!A1:Z1000`. Values
//! are always written with `USER_ENTERED` so numbers and dates are parsed
//! the way a person typing them would see them.

use ordersync_core::SheetContents;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::GoogleWorkspace;
use crate::error::GoogleError;

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Debug, Serialize)]
struct ValueInput<'a> {
    range: &'a str,
    #[serde(rename = "majorDimension")]
    major_dimension: &'static str,
    values: &'a [Vec<String>],
}

/// Renders a cell as the text a user would see.
fn cell_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

impl GoogleWorkspace {
    /// Reads `range` of a spreadsheet. Trailing empty rows and cells are
    /// omitted by the API, so rows may be ragged.
    ///
    /// # Errors
    ///
    /// Returns [`GoogleError::Api`] for a non-2xx answer (404 for an unknown
    /// spreadsheet, 400 for an unknown tab).
    pub async fn read_range(
        &self,
        spreadsheet_id: &str,
        range: &str,
    ) -> Result<SheetContents, GoogleError> {
        let url = Self::endpoint(
            &self.sheets_base,
            &["spreadsheets", spreadsheet_id, "values", range],
        )?;
        let request = self.http.get(url);
        let body: ValueRange = self.send_json(request, "sheets values.get").await?;

        let values = body
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect();
        Ok(SheetContents::from_values(values))
    }

    /// Appends `rows` after the last non-empty row of the table at `range`,
    /// inserting new rows rather than overwriting.
    ///
    /// # Errors
    ///
    /// Returns [`GoogleError::Api`] if the append is refused.
    pub async fn append_rows(
        &self,
        spreadsheet_id: &str,
        range: &str,
        rows: &[Vec<String>],
    ) -> Result<(), GoogleError> {
        let action = format!("{range}:append");
        let url = Self::endpoint(
            &self.sheets_base,
            &["spreadsheets", spreadsheet_id, "values", &action],
        )?;
        let request = self
            .http
            .post(url)
            .query(&[
                ("valueInputOption", "USER_ENTERED"),
                ("insertDataOption", "INSERT_ROWS"),
            ])
            .json(&ValueInput {
                range,
                major_dimension: "ROWS",
                values: rows,
            });
        self.send_discard(request, "sheets values.append").await?;
        tracing::debug!(spreadsheet_id, range, rows = rows.len(), "appended rows");
        Ok(())
    }

    /// Writes `rows` starting at the top-left cell of `range`.
    ///
    /// # Errors
    ///
    /// Returns [`GoogleError::Api`] if the update is refused.
    pub async fn update_range(
        &self,
        spreadsheet_id: &str,
        range: &str,
        rows: &[Vec<String>],
    ) -> Result<(), GoogleError> {
        let url = Self::endpoint(
            &self.sheets_base,
            &["spreadsheets", spreadsheet_id, "values", range],
        )?;
        let request = self
            .http
            .put(url)
            .query(&[("valueInputOption", "USER_ENTERED")])
            .json(&ValueInput {
                range,
                major_dimension: "ROWS",
                values: rows,
            });
        self.send_discard(request, "sheets values.update").await?;
        tracing::debug!(spreadsheet_id, range, rows = rows.len(), "updated range");
        Ok(())
    }

    /// Clears the values of `range`, keeping formatting.
    ///
    /// # Errors
    ///
    /// Returns [`GoogleError::Api`] if the clear is refused.
    pub async fn clear_range(&self, spreadsheet_id: &str, range: &str) -> Result<(), GoogleError> {
        let action = format!("{range}:clear");
        let url = Self::endpoint(
            &self.sheets_base,
            &["spreadsheets", spreadsheet_id, "values", &action],
        )?;
        let request = self.http.post(url).json(&serde_json::json!({}));
        self.send_discard(request, "sheets values.clear").await
    }
}

//! Document-store side types: drive entries, spreadsheet handles, and the
//! values read back from a sheet.

use serde::{Deserialize, Serialize};

/// A provisioned monthly spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpreadsheetRef {
    pub id: String,
    pub name: String,
}

/// An entry of a drive folder listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub modified_time: Option<String>,
}

impl From<DriveFile> for SpreadsheetRef {
    fn from(file: DriveFile) -> Self {
        Self {
            id: file.id,
            name: file.name,
        }
    }
}

/// Cells of a sheet as seen at read time: the first row is the header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetContents {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl SheetContents {
    /// Splits raw range values into header and data rows.
    ///
    /// The Sheets API omits trailing empty cells, so data rows may be shorter
    /// than the header.
    #[must_use]
    pub fn from_values(mut values: Vec<Vec<String>>) -> Self {
        if values.is_empty() {
            return Self::default();
        }
        let header = values.remove(0);
        Self {
            header,
            rows: values,
        }
    }

    /// `true` when the sheet has no header yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.header.iter().all(|cell| cell.trim().is_empty())
    }

    #[must_use]
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.header.iter().position(|h| h == column)
    }

    /// Iterates the values of one column, skipping rows too short to have it.
    pub fn column_values<'a>(&'a self, column: &str) -> impl Iterator<Item = &'a str> + 'a {
        let index = self.column_index(column);
        self.rows
            .iter()
            .filter_map(move |row| index.and_then(|i| row.get(i)).map(String::as_str))
    }
}

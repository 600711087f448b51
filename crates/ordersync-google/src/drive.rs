//! Drive v3 `files` endpoints: folder listing, creation and deletion.

use ordersync_core::DriveFile;
use serde::{Deserialize, Serialize};

use crate::client::GoogleWorkspace;
use crate::error::GoogleError;

pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";
pub const SPREADSHEET_MIME_TYPE: &str = "application/vnd.google-apps.spreadsheet";

const LIST_FIELDS: &str = "nextPageToken, files(id, name, mimeType, modifiedTime)";
const FILE_FIELDS: &str = "id, name, mimeType, modifiedTime";
const PAGE_SIZE: &str = "1000";

/// Upper bound on listing pages, 1000 entries each.
const MAX_LIST_PAGES: usize = 100;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileList {
    #[serde(default)]
    files: Vec<DriveFile>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NewFile<'a> {
    name: &'a str,
    mime_type: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parents: Option<[&'a str; 1]>,
}

/// Builds the `q` expression selecting live children of `folder_id`.
///
/// Single quotes and backslashes inside the ID are escaped as the Drive
/// query grammar requires.
fn children_query(folder_id: &str, modified_since: Option<&str>) -> String {
    let escaped = folder_id.replace('\\', "\\\\").replace('\'', "\\'");
    let mut q = format!("'{escaped}' in parents and trashed = false");
    if let Some(since) = modified_since {
        let since = since.replace('\'', "\\'");
        q.push_str(&format!(" and modifiedTime > '{since}'"));
    }
    q
}

impl GoogleWorkspace {
    /// Lists every non-trashed file directly inside `folder_id`, following
    /// `nextPageToken` until the listing is complete.
    ///
    /// Shared drives are included. When `modified_since` is given (RFC 3339),
    /// only files modified after it are returned.
    ///
    /// # Errors
    ///
    /// Returns [`GoogleError::Api`] for a non-2xx answer (404 for an unknown
    /// folder), [`GoogleError::Http`] on network failure, or
    /// [`GoogleError::Deserialize`] if a page is not a file list.
    pub async fn list_files(
        &self,
        folder_id: &str,
        modified_since: Option<&str>,
    ) -> Result<Vec<DriveFile>, GoogleError> {
        let url = Self::endpoint(&self.drive_base, &["files"])?;
        let q = children_query(folder_id, modified_since);
        let mut files = Vec::new();
        let mut page_token: Option<String> = None;

        for page in 1..=MAX_LIST_PAGES {
            let mut request = self.http.get(url.clone()).query(&[
                ("q", q.as_str()),
                ("fields", LIST_FIELDS),
                ("pageSize", PAGE_SIZE),
                ("supportsAllDrives", "true"),
                ("includeItemsFromAllDrives", "true"),
            ]);
            if let Some(token) = page_token.as_deref() {
                request = request.query(&[("pageToken", token)]);
            }

            let list: FileList = self.send_json(request, "drive files.list").await?;
            tracing::debug!(folder_id, page, count = list.files.len(), "listed drive page");
            files.extend(list.files);

            match list.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => return Ok(files),
            }
        }

        tracing::warn!(
            folder_id,
            max_pages = MAX_LIST_PAGES,
            "drive listing truncated at page limit"
        );
        Ok(files)
    }

    /// Creates an empty Google Sheets spreadsheet named `name` inside `folder_id`.
    ///
    /// # Errors
    ///
    /// Returns [`GoogleError::Api`] if Drive refuses the creation, or
    /// [`GoogleError::Http`] / [`GoogleError::Deserialize`] on transport failures.
    pub async fn create_spreadsheet(
        &self,
        name: &str,
        folder_id: &str,
    ) -> Result<DriveFile, GoogleError> {
        self.create_file(name, SPREADSHEET_MIME_TYPE, Some(folder_id))
            .await
    }

    /// Creates a folder named `name`, inside `parent` or at the drive root.
    ///
    /// # Errors
    ///
    /// Same as [`GoogleWorkspace::create_spreadsheet`].
    pub async fn create_folder(
        &self,
        name: &str,
        parent: Option<&str>,
    ) -> Result<DriveFile, GoogleError> {
        self.create_file(name, FOLDER_MIME_TYPE, parent).await
    }

    async fn create_file(
        &self,
        name: &str,
        mime_type: &str,
        parent: Option<&str>,
    ) -> Result<DriveFile, GoogleError> {
        let url = Self::endpoint(&self.drive_base, &["files"])?;
        let body = NewFile {
            name,
            mime_type,
            parents: parent.map(|p| [p]),
        };
        let request = self
            .http
            .post(url)
            .query(&[("supportsAllDrives", "true"), ("fields", FILE_FIELDS)])
            .json(&body);

        let file: DriveFile = self.send_json(request, "drive files.create").await?;
        tracing::info!(file_id = %file.id, name, mime_type, "created drive file");
        Ok(file)
    }

    /// Permanently deletes a file (not moved to trash).
    ///
    /// # Errors
    ///
    /// Returns [`GoogleError::Api`] if Drive refuses, 404 included.
    pub async fn delete_file(&self, file_id: &str) -> Result<(), GoogleError> {
        let url = Self::endpoint(&self.drive_base, &["files", file_id])?;
        let request = self
            .http
            .delete(url)
            .query(&[("supportsAllDrives", "true")]);
        self.send_discard(request, "drive files.delete").await?;
        tracing::info!(file_id, "deleted drive file");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn children_query_excludes_trash() {
        assert_eq!(
            children_query("folder-1", None),
            "'folder-1' in parents and trashed = false"
        );
    }

    #[test]
    fn children_query_escapes_quotes() {
        assert_eq!(
            children_query("o'brien", None),
            "'o\\'brien' in parents and trashed = false"
        );
    }

    #[test]
    fn children_query_adds_modified_filter() {
        assert_eq!(
            children_query("f", Some("2025-06-01T00:00:00Z")),
            "'f' in parents and trashed = false and modifiedTime > '2025-06-01T00:00:00Z'"
        );
    }

    #[test]
    fn new_file_serializes_drive_field_names() {
        let body = serde_json::to_value(NewFile {
            name: "Commandes 2025-06",
            mime_type: SPREADSHEET_MIME_TYPE,
            parents: Some(["folder-1"]),
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "name": "Commandes 2025-06",
                "mimeType": "application/vnd.google-apps.spreadsheet",
                "parents": ["folder-1"]
            })
        );
    }
}

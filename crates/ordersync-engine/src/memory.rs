//! In-memory collaborators for tests.
//!
//! [`MemoryStore`] keeps a flat list of files with their parent folder and,
//! for spreadsheets, a grid of cell values. Failures can be injected per
//! spreadsheet name. [`FixedSource`] serves a canned order list.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use ordersync_core::{DriveFile, SheetContents, SpreadsheetRef};
use ordersync_google::GoogleError;
use ordersync_shopify::{ShopifyError, ShopifyOrder};

use crate::error::CollaboratorError;
use crate::ports::{DocumentStore, OrderSource, OrderWindow};

const SPREADSHEET_MIME: &str = "application/vnd.google-apps.spreadsheet";
const FOLDER_MIME: &str = "application/vnd.google-apps.folder";

struct StoredFile {
    file: DriveFile,
    parent: Option<String>,
}

#[derive(Default)]
struct State {
    files: Vec<StoredFile>,
    values: HashMap<String, Vec<Vec<String>>>,
    next_id: usize,
    fail_create: HashSet<String>,
    fail_write: HashSet<String>,
    fail_read: HashSet<String>,
    fail_list: bool,
    fail_delete: bool,
    reads: usize,
}

impl State {
    fn mint_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }

    fn name_of(&self, id: &str) -> Option<&str> {
        self.files
            .iter()
            .find(|f| f.file.id == id)
            .map(|f| f.file.name.as_str())
    }

    fn check(&self, id: &str, failing: &HashSet<String>, context: &str) -> Result<(), CollaboratorError> {
        match self.name_of(id) {
            None => Err(store_error(context, 404, &format!("File not found: {id}."))),
            Some(name) if failing.contains(name) => {
                Err(store_error(context, 500, "injected failure"))
            }
            Some(_) => Ok(()),
        }
    }
}

fn store_error(context: &str, status: u16, message: &str) -> CollaboratorError {
    CollaboratorError::DocumentStore(GoogleError::Api {
        context: context.to_owned(),
        status,
        message: message.to_owned(),
    })
}

/// Row limit of an `A1:Z{n}` range, if it has one.
fn row_limit(range: &str) -> Option<usize> {
    range
        .rsplit_once(":Z")
        .and_then(|(_, rows)| rows.parse::<usize>().ok())
}

/// Document store held entirely in memory.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds a spreadsheet with the given cells and returns its ID.
    pub fn seed_sheet(&self, folder_id: &str, name: &str, values: Vec<Vec<String>>) -> String {
        let mut state = self.state();
        let id = state.mint_id("sheet");
        state.files.push(StoredFile {
            file: DriveFile {
                id: id.clone(),
                name: name.to_owned(),
                mime_type: Some(SPREADSHEET_MIME.to_owned()),
                modified_time: None,
            },
            parent: Some(folder_id.to_owned()),
        });
        state.values.insert(id.clone(), values);
        id
    }

    /// Adds a non-spreadsheet file and returns its ID.
    pub fn seed_file(&self, folder_id: &str, name: &str) -> String {
        let mut state = self.state();
        let id = state.mint_id("file");
        state.files.push(StoredFile {
            file: DriveFile {
                id: id.clone(),
                name: name.to_owned(),
                mime_type: Some("text/plain".to_owned()),
                modified_time: None,
            },
            parent: Some(folder_id.to_owned()),
        });
        id
    }

    /// Creating a spreadsheet with this name fails.
    pub fn fail_create(&self, name: &str) {
        self.state().fail_create.insert(name.to_owned());
    }

    /// Appends, updates and clears on the spreadsheet with this name fail.
    pub fn fail_write(&self, name: &str) {
        self.state().fail_write.insert(name.to_owned());
    }

    /// Reads of the spreadsheet with this name fail.
    pub fn fail_read(&self, name: &str) {
        self.state().fail_read.insert(name.to_owned());
    }

    pub fn fail_list(&self) {
        self.state().fail_list = true;
    }

    pub fn fail_delete(&self) {
        self.state().fail_delete = true;
    }

    /// Names of the files in `folder_id`, in creation order.
    #[must_use]
    pub fn sheet_names(&self, folder_id: &str) -> Vec<String> {
        self.state()
            .files
            .iter()
            .filter(|f| f.parent.as_deref() == Some(folder_id))
            .map(|f| f.file.name.clone())
            .collect()
    }

    /// Cells of the first spreadsheet named `name` in `folder_id`.
    #[must_use]
    pub fn values_of(&self, folder_id: &str, name: &str) -> Option<Vec<Vec<String>>> {
        let state = self.state();
        let file = state
            .files
            .iter()
            .find(|f| f.parent.as_deref() == Some(folder_id) && f.file.name == name)?;
        state.values.get(&file.file.id).cloned()
    }

    /// Number of range reads served so far.
    #[must_use]
    pub fn read_count(&self) -> usize {
        self.state().reads
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn list_files(
        &self,
        folder_id: &str,
        _modified_since: Option<&str>,
    ) -> Result<Vec<DriveFile>, CollaboratorError> {
        let state = self.state();
        if state.fail_list {
            return Err(store_error("drive files.list", 500, "injected failure"));
        }
        Ok(state
            .files
            .iter()
            .filter(|f| f.parent.as_deref() == Some(folder_id))
            .map(|f| f.file.clone())
            .collect())
    }

    async fn create_folder(
        &self,
        name: &str,
        parent: Option<&str>,
    ) -> Result<DriveFile, CollaboratorError> {
        let mut state = self.state();
        let id = state.mint_id("folder");
        let file = DriveFile {
            id,
            name: name.to_owned(),
            mime_type: Some(FOLDER_MIME.to_owned()),
            modified_time: None,
        };
        state.files.push(StoredFile {
            file: file.clone(),
            parent: parent.map(str::to_owned),
        });
        Ok(file)
    }

    async fn delete_file(&self, file_id: &str) -> Result<(), CollaboratorError> {
        let mut state = self.state();
        if state.fail_delete {
            return Err(store_error("drive files.delete", 403, "injected failure"));
        }
        let before = state.files.len();
        state.files.retain(|f| f.file.id != file_id);
        if state.files.len() == before {
            return Err(store_error(
                "drive files.delete",
                404,
                &format!("File not found: {file_id}."),
            ));
        }
        state.values.remove(file_id);
        Ok(())
    }

    async fn create_spreadsheet(
        &self,
        name: &str,
        folder_id: &str,
    ) -> Result<SpreadsheetRef, CollaboratorError> {
        if self.state().fail_create.contains(name) {
            return Err(store_error("drive files.create", 500, "injected failure"));
        }
        let id = self.seed_sheet(folder_id, name, Vec::new());
        Ok(SpreadsheetRef {
            id,
            name: name.to_owned(),
        })
    }

    async fn read_range(
        &self,
        spreadsheet_id: &str,
        range: &str,
    ) -> Result<SheetContents, CollaboratorError> {
        let mut state = self.state();
        state.check(spreadsheet_id, &state.fail_read, "sheets values.get")?;
        state.reads += 1;
        let mut values = state.values.get(spreadsheet_id).cloned().unwrap_or_default();
        if let Some(limit) = row_limit(range) {
            values.truncate(limit);
        }
        Ok(SheetContents::from_values(values))
    }

    async fn append_rows(
        &self,
        spreadsheet_id: &str,
        _range: &str,
        rows: &[Vec<String>],
    ) -> Result<(), CollaboratorError> {
        let mut state = self.state();
        state.check(spreadsheet_id, &state.fail_write, "sheets values.append")?;
        state
            .values
            .entry(spreadsheet_id.to_owned())
            .or_default()
            .extend(rows.iter().cloned());
        Ok(())
    }

    async fn update_range(
        &self,
        spreadsheet_id: &str,
        _range: &str,
        rows: &[Vec<String>],
    ) -> Result<(), CollaboratorError> {
        let mut state = self.state();
        state.check(spreadsheet_id, &state.fail_write, "sheets values.update")?;
        let grid = state.values.entry(spreadsheet_id.to_owned()).or_default();
        for (i, row) in rows.iter().enumerate() {
            match grid.get_mut(i) {
                Some(existing) => existing.clone_from(row),
                None => grid.push(row.clone()),
            }
        }
        Ok(())
    }

    async fn clear_range(
        &self,
        spreadsheet_id: &str,
        _range: &str,
    ) -> Result<(), CollaboratorError> {
        let mut state = self.state();
        state.check(spreadsheet_id, &state.fail_write, "sheets values.clear")?;
        state.values.insert(spreadsheet_id.to_owned(), Vec::new());
        Ok(())
    }
}

/// Order source returning a fixed list, or failing.
pub struct FixedSource {
    orders: Vec<ShopifyOrder>,
    fail: bool,
    windows: Mutex<Vec<OrderWindow>>,
}

impl FixedSource {
    #[must_use]
    pub fn new(orders: Vec<ShopifyOrder>) -> Self {
        Self {
            orders,
            fail: false,
            windows: Mutex::new(Vec::new()),
        }
    }

    /// A source whose every fetch fails with HTTP 503.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(Vec::new())
        }
    }

    /// Windows requested so far.
    #[must_use]
    pub fn windows(&self) -> Vec<OrderWindow> {
        self.windows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl OrderSource for FixedSource {
    async fn fetch_orders(
        &self,
        window: &OrderWindow,
    ) -> Result<Vec<ShopifyOrder>, CollaboratorError> {
        self.windows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(window.clone());
        if self.fail {
            return Err(CollaboratorError::OrderSource(
                ShopifyError::UnexpectedStatus {
                    status: 503,
                    url: "memory://orders.json".to_owned(),
                },
            ));
        }
        Ok(self.orders.clone())
    }
}

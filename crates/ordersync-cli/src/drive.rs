//! Drive folder inspection commands.

use std::fmt::Write as _;

use clap::Subcommand;
use ordersync_core::{DriveFile, MonthKey, SheetContents};
use ordersync_engine::{provisioner, DocumentStore, SyncSettings};

/// Sub-commands available under `drive`.
#[derive(Debug, Subcommand)]
pub enum DriveCommands {
    /// List the files in the configured folder
    List {
        /// Only files modified after this RFC 3339 timestamp
        #[arg(long)]
        modified_since: Option<String>,
    },
    /// Print the rows of one month's sheet
    Show {
        /// Month as YYYY-MM
        #[arg(long)]
        month: MonthKey,
    },
    /// Create a folder, under the configured one unless `--parent` is given
    CreateFolder {
        name: String,
        #[arg(long)]
        parent: Option<String>,
    },
}

pub(crate) async fn run(
    store: &dyn DocumentStore,
    settings: &SyncSettings,
    command: DriveCommands,
) -> anyhow::Result<()> {
    match command {
        DriveCommands::List { modified_since } => {
            let files = store
                .list_files(&settings.folder_id, modified_since.as_deref())
                .await?;
            print!("{}", format_listing(&files));
        }
        DriveCommands::Show { month } => match show_month(store, settings, &month).await? {
            Some(contents) => print!("{}", format_contents(&contents)),
            None => println!("no sheet named \"{}\"", month.sheet_name()),
        },
        DriveCommands::CreateFolder { name, parent } => {
            let parent = parent.unwrap_or_else(|| settings.folder_id.clone());
            let folder = store.create_folder(&name, Some(&parent)).await?;
            println!("{}\t{}", folder.id, folder.name);
        }
    }
    Ok(())
}

/// Reads the month's sheet, bounded by the configured scan range.
pub(crate) async fn show_month(
    store: &dyn DocumentStore,
    settings: &SyncSettings,
    month: &MonthKey,
) -> anyhow::Result<Option<SheetContents>> {
    let Some(sheet) = provisioner::find_sheet(store, &settings.folder_id, month).await? else {
        return Ok(None);
    };
    let contents = store
        .read_range(&sheet.id, &settings.layout.scan_range())
        .await?;
    Ok(Some(contents))
}

pub(crate) fn format_listing(files: &[DriveFile]) -> String {
    if files.is_empty() {
        return "folder is empty\n".to_owned();
    }
    let mut out = String::new();
    for file in files {
        let _ = writeln!(
            out,
            "{}\t{}\t{}\t{}",
            file.id,
            file.name,
            file.mime_type.as_deref().unwrap_or("-"),
            file.modified_time.as_deref().unwrap_or("-"),
        );
    }
    out
}

pub(crate) fn format_contents(contents: &SheetContents) -> String {
    if contents.is_empty() {
        return "sheet is empty\n".to_owned();
    }
    let mut out = String::new();
    let _ = writeln!(out, "{}", contents.header.join("\t"));
    for row in &contents.rows {
        let _ = writeln!(out, "{}", row.join("\t"));
    }
    out
}

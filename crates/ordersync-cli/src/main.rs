mod drive;
mod sync;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use ordersync_engine::{adapters, SyncSettings};
use tracing_subscriber::EnvFilter;

use crate::drive::DriveCommands;

#[derive(Debug, Parser)]
#[command(name = "ordersync-cli")]
#[command(about = "Shopify orders to monthly Google Sheets")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Rebuild every monthly sheet from Shopify
    Reset {
        /// Window start (RFC 3339); defaults to `ORDERSYNC_RESET_DEFAULT_START`
        #[arg(long)]
        start: Option<String>,
        /// Window end (RFC 3339); defaults to now
        #[arg(long)]
        end: Option<String>,
        /// Fetch and group only; the folder is left untouched
        #[arg(long)]
        simulate: bool,
    },
    /// Append one order, read as Shopify JSON, to its monthly sheet
    Push {
        /// Order JSON file, `-` for stdin
        #[arg(long)]
        file: PathBuf,
        /// Shop domain to declare; defaults to the accepted one
        #[arg(long)]
        shop: Option<String>,
    },
    /// Inspect or prepare the Drive folder
    Drive {
        #[command(subcommand)]
        command: DriveCommands,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("ordersync-cli: pass --help for commands");
        return Ok(());
    };

    let config = ordersync_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let collaborators = adapters::connect(&config).await?;
    let settings = Arc::new(SyncSettings::from_config(&config));

    match command {
        Commands::Reset {
            start,
            end,
            simulate,
        } => {
            let summary = sync::run_reset(
                collaborators.source,
                collaborators.store,
                settings,
                start,
                end,
                simulate,
            )
            .await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Commands::Push { file, shop } => {
            let raw = sync::read_order_input(&file).await?;
            let order = sync::parse_order(&raw)?;
            let report =
                sync::run_push(collaborators.store, settings, shop.as_deref(), &order).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Drive { command } => {
            drive::run(collaborators.store.as_ref(), &settings, command).await?;
        }
    }

    Ok(())
}

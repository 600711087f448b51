pub mod app_config;
pub mod config;
pub mod orders;
pub mod sheets;

use thiserror::Error;

pub use app_config::{AppConfig, Environment, InvalidTimestampPolicy};
pub use config::{load_app_config, load_app_config_from_env};
pub use orders::{parse_order_timestamp, MonthKey, NormalizedRow, ORDER_NUMBER_COLUMN};
pub use sheets::{DriveFile, SheetContents, SpreadsheetRef};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid order timestamp \"{value}\": {reason}")]
    InvalidTimestamp { value: String, reason: String },

    #[error("invalid month key \"{0}\": expected YYYY-MM")]
    InvalidMonth(String),
}

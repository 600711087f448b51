//! Google Drive v3 and Sheets v4 client used as the order spreadsheet store.

pub mod auth;
pub mod client;
pub mod drive;
pub mod error;
pub mod sheets;

pub use auth::TokenProvider;
pub use client::{build_http_client, GoogleWorkspace};
pub use error::GoogleError;

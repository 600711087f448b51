use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// What a reset does with an order whose `created_at` cannot be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InvalidTimestampPolicy {
    /// Fail the whole batch before anything is written.
    #[default]
    Abort,
    /// Log the order and leave it out of every monthly sheet.
    Skip,
}

impl std::fmt::Display for InvalidTimestampPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidTimestampPolicy::Abort => write!(f, "abort"),
            InvalidTimestampPolicy::Skip => write!(f, "skip"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Shared secret expected in the `password` header of reset requests.
    pub reset_password: String,
    /// Shop domain expected in `x-shopify-shop-domain` on pushed orders.
    pub shopify_accepted_domain: String,
    /// Drive folder holding the `Commandes YYYY-MM` spreadsheets.
    pub drive_folder_id: String,
    pub shopify_merchant: String,
    pub shopify_api_token: String,
    pub shopify_api_version: String,
    pub shopify_page_limit: u32,
    pub http_timeout_secs: u64,
    pub user_agent: String,
    pub google_service_account_path: Option<PathBuf>,
    pub google_service_account_json: Option<String>,
    pub google_access_token: Option<String>,
    /// Tab written to inside every monthly spreadsheet.
    pub sheet_tab: String,
    /// Last row read back when checking a sheet for an existing order.
    pub scan_max_rows: u32,
    /// Window start used by a reset request that does not name one.
    pub reset_default_start: String,
    pub invalid_timestamp_policy: InvalidTimestampPolicy,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("reset_password", &"[redacted]")
            .field("shopify_accepted_domain", &self.shopify_accepted_domain)
            .field("drive_folder_id", &self.drive_folder_id)
            .field("shopify_merchant", &self.shopify_merchant)
            .field("shopify_api_token", &"[redacted]")
            .field("shopify_api_version", &self.shopify_api_version)
            .field("shopify_page_limit", &self.shopify_page_limit)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field(
                "google_service_account_path",
                &self.google_service_account_path,
            )
            .field(
                "google_service_account_json",
                &self.google_service_account_json.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "google_access_token",
                &self.google_access_token.as_ref().map(|_| "[redacted]"),
            )
            .field("sheet_tab", &self.sheet_tab)
            .field("scan_max_rows", &self.scan_max_rows)
            .field("reset_default_start", &self.reset_default_start)
            .field("invalid_timestamp_policy", &self.invalid_timestamp_policy)
            .finish()
    }
}

use crate::app_config::{AppConfig, Environment, InvalidTimestampPolicy};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from the process environment only; no
/// `.env` file is read.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Parses and validates the configuration through `lookup`, which tests
/// back with a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    // Blank counts as missing.
    let require = |var: &str| -> Result<String, ConfigError> {
        match lookup(var) {
            Ok(value) if !value.trim().is_empty() => Ok(value),
            _ => Err(ConfigError::MissingEnvVar(var.to_string())),
        }
    };

    let optional = |var: &str| -> Option<String> { lookup(var).ok().filter(|v| !v.is_empty()) };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let reset_password = require("RESET_PASSWORD")?;
    let shopify_accepted_domain = require("SHOPIFY_ACCEPTED_URL")?;
    let drive_folder_id = require("DRIVE_FOLDER_ID")?;
    let shopify_merchant = require("SHOPIFY_MERCHANT")?;
    let shopify_api_token = require("SHOPIFY_API_TOKEN")?;

    let env = parse_environment(&or_default("ORDERSYNC_ENV", "development"))?;
    let bind_addr = parse("ORDERSYNC_BIND_ADDR", "0.0.0.0:8080")?;
    let log_level = or_default("ORDERSYNC_LOG_LEVEL", "info");

    let shopify_api_version = or_default("SHOPIFY_API_VERSION", "2025-07");
    let shopify_page_limit = parse_u32("ORDERSYNC_SHOPIFY_PAGE_LIMIT", "250")?;
    if shopify_page_limit == 0 || shopify_page_limit > 250 {
        return Err(ConfigError::InvalidEnvVar {
            var: "ORDERSYNC_SHOPIFY_PAGE_LIMIT".to_string(),
            reason: format!("must be between 1 and 250, got {shopify_page_limit}"),
        });
    }

    let http_timeout_secs = parse_u64("ORDERSYNC_HTTP_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("ORDERSYNC_USER_AGENT", "ordersync/0.1 (order-sheets)");

    let google_service_account_path = optional("GOOGLE_SERVICE_ACCOUNT_KEY").map(PathBuf::from);
    let google_service_account_json = optional("SERVICE_ACCOUNT_FILE");
    let google_access_token = optional("GOOGLE_ACCESS_TOKEN");

    let sheet_tab = or_default("ORDERSYNC_SHEET_TAB", "Sheet1");
    let scan_max_rows = parse_u32("ORDERSYNC_SCAN_MAX_ROWS", "1000")?;
    if scan_max_rows < 2 {
        return Err(ConfigError::InvalidEnvVar {
            var: "ORDERSYNC_SCAN_MAX_ROWS".to_string(),
            reason: "must cover at least the header and one data row".to_string(),
        });
    }

    let reset_default_start = or_default("ORDERSYNC_RESET_DEFAULT_START", "2025-04-01T00:00:00Z");
    let invalid_timestamp_policy = parse_timestamp_policy(&or_default(
        "ORDERSYNC_INVALID_TIMESTAMP_POLICY",
        "abort",
    ))?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        reset_password,
        shopify_accepted_domain,
        drive_folder_id,
        shopify_merchant,
        shopify_api_token,
        shopify_api_version,
        shopify_page_limit,
        http_timeout_secs,
        user_agent,
        google_service_account_path,
        google_service_account_json,
        google_access_token,
        sheet_tab,
        scan_max_rows,
        reset_default_start,
        invalid_timestamp_policy,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "ORDERSYNC_ENV".to_string(),
            reason: format!("expected development, test, or production; got \"{other}\""),
        }),
    }
}

fn parse_timestamp_policy(s: &str) -> Result<InvalidTimestampPolicy, ConfigError> {
    match s {
        "abort" => Ok(InvalidTimestampPolicy::Abort),
        "skip" => Ok(InvalidTimestampPolicy::Skip),
        other => Err(ConfigError::InvalidEnvVar {
            var: "ORDERSYNC_INVALID_TIMESTAMP_POLICY".to_string(),
            reason: format!("expected abort or skip; got \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

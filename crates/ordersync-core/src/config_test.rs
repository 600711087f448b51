use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

/// Returns a map with all required env vars populated with valid values.
fn full_env<'a>() -> HashMap<&'a str, &'a str> {
    let mut m = HashMap::new();
    m.insert("RESET_PASSWORD", "hunter2");
    m.insert("SHOPIFY_ACCEPTED_URL", "maison-test.myshopify.com");
    m.insert("DRIVE_FOLDER_ID", "folder-123");
    m.insert("SHOPIFY_MERCHANT", "maison-test");
    m.insert("SHOPIFY_API_TOKEN", "shpat_test");
    m
}

#[test]
fn parse_environment_development() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
}

#[test]
fn parse_environment_production() {
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "ORDERSYNC_ENV"));
}

#[test]
fn build_app_config_fails_without_reset_password() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "RESET_PASSWORD"),
        "expected MissingEnvVar(RESET_PASSWORD), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_blank_reset_password() {
    let mut map = full_env();
    map.insert("RESET_PASSWORD", "   ");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "RESET_PASSWORD"),
        "expected MissingEnvVar(RESET_PASSWORD), got: {result:?}"
    );
}

#[test]
fn build_app_config_fails_without_drive_folder() {
    let mut map = full_env();
    map.remove("DRIVE_FOLDER_ID");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "DRIVE_FOLDER_ID"),
        "expected MissingEnvVar(DRIVE_FOLDER_ID), got: {result:?}"
    );
}

#[test]
fn build_app_config_fails_with_invalid_bind_addr() {
    let mut map = full_env();
    map.insert("ORDERSYNC_BIND_ADDR", "not-a-socket-addr");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "ORDERSYNC_BIND_ADDR"),
        "expected InvalidEnvVar(ORDERSYNC_BIND_ADDR), got: {result:?}"
    );
}

#[test]
fn build_app_config_succeeds_with_all_required_vars() {
    let map = full_env();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:8080");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.reset_password, "hunter2");
    assert_eq!(cfg.drive_folder_id, "folder-123");
    assert_eq!(cfg.shopify_api_version, "2025-07");
    assert_eq!(cfg.shopify_page_limit, 250);
    assert_eq!(cfg.http_timeout_secs, 30);
    assert_eq!(cfg.sheet_tab, "Sheet1");
    assert_eq!(cfg.scan_max_rows, 1000);
    assert_eq!(cfg.reset_default_start, "2025-04-01T00:00:00Z");
    assert_eq!(cfg.invalid_timestamp_policy, InvalidTimestampPolicy::Abort);
    assert!(cfg.google_service_account_path.is_none());
    assert!(cfg.google_service_account_json.is_none());
    assert!(cfg.google_access_token.is_none());
}

#[test]
fn shopify_page_limit_above_api_maximum_is_rejected() {
    let mut map = full_env();
    map.insert("ORDERSYNC_SHOPIFY_PAGE_LIMIT", "500");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "ORDERSYNC_SHOPIFY_PAGE_LIMIT"),
        "expected InvalidEnvVar(ORDERSYNC_SHOPIFY_PAGE_LIMIT), got: {result:?}"
    );
}

#[test]
fn scan_max_rows_override() {
    let mut map = full_env();
    map.insert("ORDERSYNC_SCAN_MAX_ROWS", "5000");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.scan_max_rows, 5000);
}

#[test]
fn scan_max_rows_invalid() {
    let mut map = full_env();
    map.insert("ORDERSYNC_SCAN_MAX_ROWS", "lots");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "ORDERSYNC_SCAN_MAX_ROWS"),
        "expected InvalidEnvVar(ORDERSYNC_SCAN_MAX_ROWS), got: {result:?}"
    );
}

#[test]
fn invalid_timestamp_policy_skip() {
    let mut map = full_env();
    map.insert("ORDERSYNC_INVALID_TIMESTAMP_POLICY", "skip");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.invalid_timestamp_policy, InvalidTimestampPolicy::Skip);
}

#[test]
fn invalid_timestamp_policy_unknown_fails() {
    let mut map = full_env();
    map.insert("ORDERSYNC_INVALID_TIMESTAMP_POLICY", "ignore");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "ORDERSYNC_INVALID_TIMESTAMP_POLICY"),
        "expected InvalidEnvVar(ORDERSYNC_INVALID_TIMESTAMP_POLICY), got: {result:?}"
    );
}

#[test]
fn google_credentials_are_picked_up() {
    let mut map = full_env();
    map.insert("GOOGLE_SERVICE_ACCOUNT_KEY", "var/service_account.json");
    map.insert("GOOGLE_ACCESS_TOKEN", "ya29.token");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(
        cfg.google_service_account_path.as_deref(),
        Some(std::path::Path::new("var/service_account.json"))
    );
    assert_eq!(cfg.google_access_token.as_deref(), Some("ya29.token"));
}

#[test]
fn debug_output_redacts_secrets() {
    let map = full_env();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("hunter2"));
    assert!(!rendered.contains("shpat_test"));
    assert!(rendered.contains("folder-123"));
}

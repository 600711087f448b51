use ordersync_core::{AppConfig, InvalidTimestampPolicy};
use subtle::ConstantTimeEq;

use crate::layout::SheetLayout;

/// What the orchestrators need from the application config.
#[derive(Clone)]
pub struct SyncSettings {
    /// Drive folder holding the monthly spreadsheets.
    pub folder_id: String,
    pub reset_secret: String,
    /// Shop domain a push must declare.
    pub accepted_source: String,
    pub layout: SheetLayout,
    /// Reset window start when the request gives none.
    pub default_start: String,
    pub timestamp_policy: InvalidTimestampPolicy,
}

impl SyncSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            folder_id: config.drive_folder_id.clone(),
            reset_secret: config.reset_password.clone(),
            accepted_source: config.shopify_accepted_domain.clone(),
            layout: SheetLayout::new(&config.sheet_tab, config.scan_max_rows),
            default_start: config.reset_default_start.clone(),
            timestamp_policy: config.invalid_timestamp_policy,
        }
    }

    /// Constant-time comparison against the reset secret. Blank never matches.
    #[must_use]
    pub fn reset_secret_matches(&self, candidate: &str) -> bool {
        !candidate.is_empty()
            && !self.reset_secret.is_empty()
            && bool::from(candidate.as_bytes().ct_eq(self.reset_secret.as_bytes()))
    }

    /// Domains compare case-insensitively, surrounding whitespace ignored.
    #[must_use]
    pub fn source_is_trusted(&self, declared: &str) -> bool {
        let declared = declared.trim();
        !declared.is_empty() && declared.eq_ignore_ascii_case(self.accepted_source.trim())
    }
}

impl std::fmt::Debug for SyncSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncSettings")
            .field("folder_id", &self.folder_id)
            .field("reset_secret", &"[redacted]")
            .field("accepted_source", &self.accepted_source)
            .field("layout", &self.layout)
            .field("default_start", &self.default_start)
            .field("timestamp_policy", &self.timestamp_policy)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> SyncSettings {
        SyncSettings {
            folder_id: "folder".to_owned(),
            reset_secret: "s3cret".to_owned(),
            accepted_source: "maison.myshopify.com".to_owned(),
            layout: SheetLayout::default(),
            default_start: "2025-04-01T00:00:00Z".to_owned(),
            timestamp_policy: InvalidTimestampPolicy::Abort,
        }
    }

    #[test]
    fn reset_secret_must_match_exactly() {
        let s = settings();
        assert!(s.reset_secret_matches("s3cret"));
        assert!(!s.reset_secret_matches("s3cret "));
        assert!(!s.reset_secret_matches("S3CRET"));
        assert!(!s.reset_secret_matches(""));
    }

    #[test]
    fn blank_configured_secret_never_matches() {
        let s = SyncSettings {
            reset_secret: String::new(),
            ..settings()
        };
        assert!(!s.reset_secret_matches(""));
    }

    #[test]
    fn source_domain_ignores_case() {
        let s = settings();
        assert!(s.source_is_trusted("Maison.myshopify.com"));
        assert!(!s.source_is_trusted("evil.myshopify.com"));
        assert!(!s.source_is_trusted(""));
    }

    #[test]
    fn debug_redacts_secret() {
        assert!(!format!("{:?}", settings()).contains("s3cret"));
    }
}

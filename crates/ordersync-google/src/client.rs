//! Shared HTTP plumbing for the Drive and Sheets endpoints.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::auth::TokenProvider;
use crate::error::GoogleError;

const DRIVE_BASE: &str = "https://www.googleapis.com/drive/v3/";
const SHEETS_BASE: &str = "https://sheets.googleapis.com/v4/";

/// Builds the `reqwest::Client` shared by token minting and API calls.
///
/// # Errors
///
/// Returns [`GoogleError::Http`] if the client cannot be constructed.
pub fn build_http_client(timeout_secs: u64, user_agent: &str) -> Result<Client, GoogleError> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(user_agent)
        .build()?)
}

/// Authenticated access to one Google account's Drive and Sheets.
///
/// Drive operations live in [`crate::drive`], value operations in
/// [`crate::sheets`]. Nothing is retried; a non-2xx answer becomes
/// [`GoogleError::Api`] carrying Google's error message.
#[derive(Debug)]
pub struct GoogleWorkspace {
    pub(crate) http: Client,
    tokens: TokenProvider,
    pub(crate) drive_base: Url,
    pub(crate) sheets_base: Url,
}

/// `{"error": {"code": 404, "message": "...", "status": "NOT_FOUND"}}`
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

impl GoogleWorkspace {
    /// Client against the public Google endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`GoogleError::InvalidBaseUrl`] if a built-in endpoint fails to parse.
    pub fn new(http: Client, tokens: TokenProvider) -> Result<Self, GoogleError> {
        Self::with_base_urls(http, tokens, DRIVE_BASE, SHEETS_BASE)
    }

    /// Client with custom API base URLs (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`GoogleError::InvalidBaseUrl`] if either URL does not parse.
    pub fn with_base_urls(
        http: Client,
        tokens: TokenProvider,
        drive_base: &str,
        sheets_base: &str,
    ) -> Result<Self, GoogleError> {
        Ok(Self {
            http,
            tokens,
            drive_base: parse_base(drive_base)?,
            sheets_base: parse_base(sheets_base)?,
        })
    }

    /// Appends path segments to `base`, percent-encoding each one.
    pub(crate) fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, GoogleError> {
        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|()| GoogleError::InvalidBaseUrl {
                url: base.to_string(),
                reason: "URL cannot be a base".to_owned(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Sends an authenticated request and decodes the JSON answer.
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        context: &str,
    ) -> Result<T, GoogleError> {
        let body = self.send(request, context).await?;
        serde_json::from_str(&body).map_err(|source| GoogleError::Deserialize {
            context: context.to_owned(),
            source,
        })
    }

    /// Sends an authenticated request whose answer body is not needed.
    pub(crate) async fn send_discard(
        &self,
        request: RequestBuilder,
        context: &str,
    ) -> Result<(), GoogleError> {
        self.send(request, context).await.map(drop)
    }

    async fn send(&self, request: RequestBuilder, context: &str) -> Result<String, GoogleError> {
        let token = self.tokens.access_token().await?;
        let response = request.bearer_auth(token).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|envelope| envelope.error.message)
                .unwrap_or(body);
            tracing::warn!(context, status = status.as_u16(), %message, "Google API call failed");
            return Err(GoogleError::Api {
                context: context.to_owned(),
                status: status.as_u16(),
                message,
            });
        }
        Ok(body)
    }
}

fn parse_base(raw: &str) -> Result<Url, GoogleError> {
    let normalised = format!("{}/", raw.trim_end_matches('/'));
    Url::parse(&normalised).map_err(|e| GoogleError::InvalidBaseUrl {
        url: raw.to_owned(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_appends_and_encodes_segments() {
        let base = parse_base("https://sheets.googleapis.com/v4").unwrap();
        let url = GoogleWorkspace::endpoint(
            &base,
            &["spreadsheets", "abc", "values", "'Mes commandes'!A1:Z10"],
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/abc/values/'Mes%20commandes'!A1:Z10"
        );
    }

    #[test]
    fn endpoint_keeps_base_path() {
        let base = parse_base("http://127.0.0.1:9999/drive/v3/").unwrap();
        let url = GoogleWorkspace::endpoint(&base, &["files", "f1"]).unwrap();
        assert_eq!(url.path(), "/drive/v3/files/f1");
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(matches!(
            parse_base("not a url"),
            Err(GoogleError::InvalidBaseUrl { .. })
        ));
    }
}

//! OAuth2 access tokens for the Drive and Sheets APIs.
//!
//! Three sources are supported, tried in this order by [`TokenProvider::resolve`]:
//!
//! 1. A pre-minted bearer token (`GOOGLE_ACCESS_TOKEN`), used as is.
//! 2. A service-account key, given as JSON content or as a path to the JSON
//!    key file. A JWT signed with the key's RS256 private key is exchanged
//!    at the key's `token_uri` (JWT bearer grant).
//! 3. The GCE metadata server, when running on Google infrastructure with
//!    an attached service account.
//!
//! Minted tokens are cached until a minute before they expire.

use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::GoogleError;

/// Scopes requested for every token: full Drive plus Sheets.
pub const SCOPES: &str =
    "https://www.googleapis.com/auth/drive https://www.googleapis.com/auth/spreadsheets";

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const METADATA_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";
const REFRESH_MARGIN: Duration = Duration::from_secs(60);
const JWT_LIFETIME_SECS: u64 = 3600;

/// The fields of a service-account JSON key this client needs.
#[derive(Clone, Deserialize)]
struct ServiceAccountKey {
    client_email: String,
    private_key: String,
    #[serde(default = "default_token_uri")]
    token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_owned()
}

/// JWT claims for the service-account bearer grant.
#[derive(Debug, Serialize)]
struct JwtClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: u64,
    exp: u64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    JWT_LIFETIME_SECS
}

struct CachedToken {
    token: String,
    expires_at: SystemTime,
}

enum TokenSource {
    Static(String),
    ServiceAccount(ServiceAccountKey),
    Metadata { url: String },
}

/// Hands out bearer tokens for Google API calls.
pub struct TokenProvider {
    source: TokenSource,
    client: Client,
    cached: RwLock<Option<CachedToken>>,
}

impl std::fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match &self.source {
            TokenSource::Static(_) => "static".to_owned(),
            TokenSource::ServiceAccount(key) => format!("service-account:{}", key.client_email),
            TokenSource::Metadata { url } => format!("metadata:{url}"),
        };
        f.debug_struct("TokenProvider").field("source", &kind).finish()
    }
}

impl TokenProvider {
    fn with_source(source: TokenSource, client: Client) -> Self {
        Self {
            source,
            client,
            cached: RwLock::new(None),
        }
    }

    /// Uses a pre-minted bearer token for every call.
    #[must_use]
    pub fn from_static(token: &str, client: Client) -> Self {
        Self::with_source(TokenSource::Static(token.to_owned()), client)
    }

    /// Builds a provider from service-account JSON key content.
    ///
    /// # Errors
    ///
    /// Returns [`GoogleError::Credentials`] if the JSON is not a service-account key.
    pub fn from_service_account_json(json: &str, client: Client) -> Result<Self, GoogleError> {
        let key: ServiceAccountKey = serde_json::from_str(json).map_err(|e| {
            GoogleError::Credentials(format!("service account JSON is not a valid key: {e}"))
        })?;
        Ok(Self::with_source(TokenSource::ServiceAccount(key), client))
    }

    /// Builds a provider from a service-account JSON key file.
    ///
    /// # Errors
    ///
    /// Returns [`GoogleError::Io`] if the file cannot be read, or
    /// [`GoogleError::Credentials`] if it is not a service-account key.
    pub async fn from_service_account_file(
        path: &Path,
        client: Client,
    ) -> Result<Self, GoogleError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| GoogleError::Io {
                path: path.display().to_string(),
                source,
            })?;
        Self::from_service_account_json(&content, client)
    }

    /// Asks the GCE metadata server for tokens.
    #[must_use]
    pub fn metadata_server(client: Client) -> Self {
        Self::with_metadata_url(METADATA_TOKEN_URL, client)
    }

    /// Metadata-server provider with a custom endpoint (for testing with wiremock).
    #[must_use]
    pub fn with_metadata_url(url: &str, client: Client) -> Self {
        Self::with_source(
            TokenSource::Metadata {
                url: url.to_owned(),
            },
            client,
        )
    }

    /// Picks the first configured source: static token, key JSON, key file,
    /// then the metadata server.
    ///
    /// # Errors
    ///
    /// Propagates key parsing and file read failures. The metadata fallback
    /// itself cannot fail here; it fails on first use if unreachable.
    pub async fn resolve(
        access_token: Option<&str>,
        service_account_json: Option<&str>,
        service_account_path: Option<&Path>,
        client: Client,
    ) -> Result<Self, GoogleError> {
        if let Some(token) = access_token {
            tracing::info!("using static Google access token");
            return Ok(Self::from_static(token, client));
        }
        if let Some(json) = service_account_json {
            tracing::info!("using service account key from environment");
            return Self::from_service_account_json(json, client);
        }
        if let Some(path) = service_account_path {
            tracing::info!(path = %path.display(), "using service account key file");
            return Self::from_service_account_file(path, client).await;
        }
        tracing::info!("no service account configured; falling back to metadata server");
        Ok(Self::metadata_server(client))
    }

    /// Returns a valid access token, minting a new one when the cache is
    /// empty or about to expire.
    ///
    /// # Errors
    ///
    /// Returns [`GoogleError::Jwt`] if the key cannot sign, [`GoogleError::Api`]
    /// if the token endpoint refuses, or [`GoogleError::Http`] on network failure.
    pub async fn access_token(&self) -> Result<String, GoogleError> {
        if let TokenSource::Static(token) = &self.source {
            return Ok(token.clone());
        }

        {
            let cached = self.cached.read().await;
            if let Some(token) = cached.as_ref() {
                if token.expires_at > SystemTime::now() + REFRESH_MARGIN {
                    return Ok(token.token.clone());
                }
            }
        }

        let fresh = match &self.source {
            TokenSource::ServiceAccount(key) => self.exchange_jwt(key).await?,
            TokenSource::Metadata { url } => self.fetch_metadata_token(url).await?,
            TokenSource::Static(token) => return Ok(token.clone()),
        };

        let token = fresh.access_token.clone();
        *self.cached.write().await = Some(CachedToken {
            token: fresh.access_token,
            expires_at: SystemTime::now() + Duration::from_secs(fresh.expires_in),
        });
        Ok(token)
    }

    async fn exchange_jwt(&self, key: &ServiceAccountKey) -> Result<TokenResponse, GoogleError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| GoogleError::Credentials(format!("system clock before epoch: {e}")))?
            .as_secs();

        let claims = JwtClaims {
            iss: &key.client_email,
            scope: SCOPES,
            aud: &key.token_uri,
            iat: now,
            exp: now + JWT_LIFETIME_SECS,
        };
        let signing_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())?;
        let assertion = encode(&Header::new(Algorithm::RS256), &claims, &signing_key)?;

        tracing::debug!(client_email = %key.client_email, "exchanging service account JWT");
        let response = self
            .client
            .post(&key.token_uri)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await?;

        parse_token_response(response, "service account token exchange").await
    }

    async fn fetch_metadata_token(&self, url: &str) -> Result<TokenResponse, GoogleError> {
        let response = self
            .client
            .get(url)
            .query(&[("scopes", SCOPES.replace(' ', ","))])
            .header("Metadata-Flavor", "Google")
            .send()
            .await?;

        parse_token_response(response, "metadata server token").await
    }
}

async fn parse_token_response(
    response: reqwest::Response,
    context: &str,
) -> Result<TokenResponse, GoogleError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(GoogleError::Api {
            context: context.to_owned(),
            status: status.as_u16(),
            message: body,
        });
    }
    serde_json::from_str(&body).map_err(|source| GoogleError::Deserialize {
        context: context.to_owned(),
        source,
    })
}

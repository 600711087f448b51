use thiserror::Error;

#[derive(Debug, Error)]
pub enum GoogleError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// Non-2xx answer from a Google API, with the message from its error body.
    #[error("{context} failed with HTTP {status}: {message}")]
    Api {
        context: String,
        status: u16,
        message: String,
    },

    #[error("invalid credentials: {0}")]
    Credentials(String),

    #[error("could not sign token request: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid base URL \"{url}\": {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl GoogleError {
    /// `true` for a 404 from the API.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
    }
}

//! External music catalog client
//!
//! Spotify-shaped: OAuth2 client-credentials token endpoint plus two
//! read-only REST endpoints (track search, track lookup). The bearer token
//! is cached in a single process-wide slot because the exchange endpoint is
//! rate-limited and round-trip costly; refresh is lazy, there is no
//! background job.

use serde::Deserialize;
use serde_json::Value;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info};

const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const DEFAULT_API_BASE_URL: &str = "https://api.spotify.com/v1";
const USER_AGENT: &str = concat!("sweatlist/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Seconds shaved off the advertised token lifetime so a token handed to a
/// caller cannot expire mid-flight on the subsequent API call.
const TOKEN_EXPIRY_MARGIN_SECS: u64 = 60;

/// Lifetime assumed when the token response omits `expires_in`
const DEFAULT_TOKEN_LIFETIME_SECS: u64 = 3600;

/// Result count bound for proxied searches; no pagination beyond this page.
pub const DEFAULT_SEARCH_LIMIT: u32 = 10;

/// Catalog client errors. None are retried internally; callers decide.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog credentials not configured")]
    CredentialsMissing,

    #[error("Token exchange failed: {0}")]
    TokenExchangeFailed(String),

    #[error("Catalog request failed: {0}")]
    CatalogRequestFailed(String),

    #[error("Invalid track reference: {0}")]
    InvalidReference(String),
}

/// Catalog service endpoints and credentials. Base URLs are overridable so
/// tests can point the client at a local mock server.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub token_url: String,
    pub api_base_url: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            token_url: DEFAULT_TOKEN_URL.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }
}

/// Successful token exchange payload
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: Option<u64>,
}

/// Cached bearer credential with its absolute expiry instant
#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

/// Catalog API client
pub struct CatalogClient {
    http_client: reqwest::Client,
    config: CatalogConfig,
    // Single process-wide slot. Racing refreshers serialize here: one
    // exchange wins, the other reuses the fresh token.
    token_slot: Mutex<Option<CachedToken>>,
}

impl CatalogClient {
    pub fn new(config: CatalogConfig) -> Result<Self, CatalogError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| CatalogError::CatalogRequestFailed(e.to_string()))?;

        Ok(Self {
            http_client,
            config,
            token_slot: Mutex::new(None),
        })
    }

    pub fn has_credentials(&self) -> bool {
        self.config.client_id.is_some() && self.config.client_secret.is_some()
    }

    /// Return a usable bearer token, exchanging credentials only when the
    /// cached one is absent or no longer strictly in the future. On any
    /// failure the slot is left untouched, forcing a retry on the next call.
    pub async fn ensure_token(&self) -> Result<String, CatalogError> {
        let mut slot = self.token_slot.lock().await;

        if let Some(cached) = slot.as_ref() {
            if Instant::now() < cached.expires_at {
                return Ok(cached.access_token.clone());
            }
        }

        let (client_id, client_secret) =
            match (&self.config.client_id, &self.config.client_secret) {
                (Some(id), Some(secret)) => (id, secret),
                _ => return Err(CatalogError::CredentialsMissing),
            };

        debug!("Requesting new catalog API token");

        let response = self
            .http_client
            .post(&self.config.token_url)
            .basic_auth(client_id, Some(client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| CatalogError::TokenExchangeFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(CatalogError::TokenExchangeFailed(format!(
                "status {}: {}",
                status.as_u16(),
                error_text
            )));
        }

        let payload: TokenResponse = response
            .json()
            .await
            .map_err(|e| CatalogError::TokenExchangeFailed(format!("malformed response: {}", e)))?;

        let lifetime = payload
            .expires_in
            .unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS)
            .saturating_sub(TOKEN_EXPIRY_MARGIN_SECS);

        *slot = Some(CachedToken {
            access_token: payload.access_token.clone(),
            expires_at: Instant::now() + Duration::from_secs(lifetime),
        });

        info!("Obtained new catalog API token (usable for {}s)", lifetime);
        Ok(payload.access_token)
    }

    /// Search tracks matching the query. The payload is returned verbatim
    /// as received from the catalog, never reshaped into domain types.
    pub async fn search(&self, query: &str, limit: u32) -> Result<Value, CatalogError> {
        let token = self.ensure_token().await?;

        let url = format!("{}/search", self.config.api_base_url);
        debug!(query = %query, limit, "Searching catalog");

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&token)
            .query(&[
                ("q", query),
                ("type", "track"),
                ("limit", &limit.to_string()),
            ])
            .send()
            .await
            .map_err(|e| CatalogError::CatalogRequestFailed(e.to_string()))?;

        Self::json_payload(response).await
    }

    /// Fetch details for one track. The identifier is the final
    /// colon-delimited segment of the reference; malformed references fail
    /// before any network call.
    pub async fn lookup_track(&self, track_reference: &str) -> Result<Value, CatalogError> {
        let track_id = parse_track_id(track_reference)?;
        let token = self.ensure_token().await?;

        let url = format!("{}/tracks/{}", self.config.api_base_url, track_id);
        debug!(track_id = %track_id, "Fetching track details");

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|e| CatalogError::CatalogRequestFailed(e.to_string()))?;

        Self::json_payload(response).await
    }

    async fn json_payload(response: reqwest::Response) -> Result<Value, CatalogError> {
        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(CatalogError::CatalogRequestFailed(format!(
                "status {}: {}",
                status.as_u16(),
                error_text
            )));
        }

        response
            .json()
            .await
            .map_err(|e| CatalogError::CatalogRequestFailed(format!("malformed response: {}", e)))
    }
}

/// Extract the track identifier from a reference such as
/// `spotify:track:0VjIjW4GlUZAMYd2vXMi3b`.
pub fn parse_track_id(reference: &str) -> Result<&str, CatalogError> {
    match reference.rsplit_once(':') {
        Some((_, id)) if !id.is_empty() => Ok(id),
        _ => Err(CatalogError::InvalidReference(reference.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_track_id_extracts_final_segment() {
        assert_eq!(
            parse_track_id("spotify:track:0VjIjW4GlUZAMYd2vXMi3b").unwrap(),
            "0VjIjW4GlUZAMYd2vXMi3b"
        );
    }

    #[test]
    fn test_parse_track_id_rejects_unstructured_reference() {
        assert!(matches!(
            parse_track_id("not-a-valid-uri"),
            Err(CatalogError::InvalidReference(_))
        ));
    }

    #[test]
    fn test_parse_track_id_rejects_empty_final_segment() {
        assert!(matches!(
            parse_track_id("spotify:track:"),
            Err(CatalogError::InvalidReference(_))
        ));
    }

    #[test]
    fn test_client_creation_without_credentials() {
        let client = CatalogClient::new(CatalogConfig::default()).unwrap();
        assert!(!client.has_credentials());
    }

    #[tokio::test]
    async fn test_ensure_token_without_credentials_fails_fast() {
        let client = CatalogClient::new(CatalogConfig::default()).unwrap();
        assert!(matches!(
            client.ensure_token().await,
            Err(CatalogError::CredentialsMissing)
        ));
    }
}

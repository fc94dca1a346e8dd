//! REST client for the file-storage provider (Dropbox).
//!
//! The provider issues short-lived access tokens against a long-lived
//! refresh token, so every operation starts with an `oauth2/token` call.
//! Tokens are deliberately not cached; the endpoints here are invoked once
//! per order, not in loops.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::error::DropboxError;
use super::FileStore;
use crate::config::StorageCredentials;

const DEFAULT_BASE_URL: &str = "https://api.dropboxapi.com";

/// A REST client bound to one app's refresh-token credentials.
#[derive(Clone)]
pub struct DropboxClient {
    http: reqwest::Client,
    base_url: String,
    credentials: StorageCredentials,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    error_summary: String,
}

#[derive(Debug, Deserialize)]
struct SharedLinkResponse {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ListSharedLinksResponse {
    #[serde(default)]
    links: Vec<SharedLinkResponse>,
}

impl DropboxClient {
    /// Creates a client for the given credentials.
    pub fn new(credentials: StorageCredentials) -> Self {
        Self::with_base_url(credentials, DEFAULT_BASE_URL)
    }

    /// Creates a client pointed at a non-default endpoint (tests).
    pub fn with_base_url(credentials: StorageCredentials, base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            credentials,
        }
    }

    /// Exchanges the refresh token for a short-lived access token.
    async fn access_token(&self) -> Result<String, DropboxError> {
        let response = self
            .http
            .post(format!("{}/oauth2/token", self.base_url))
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", self.credentials.refresh_token.as_str()),
                ("client_id", self.credentials.app_key.as_str()),
                ("client_secret", self.credentials.app_secret.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DropboxError::TokenRefresh(format!("HTTP {status}: {body}")));
        }

        let token: TokenResponse = response.json().await?;
        token
            .access_token
            .ok_or_else(|| DropboxError::TokenRefresh("no access_token in response".to_string()))
    }

    /// Reads a failed API response into an [`DropboxError::Api`], keeping
    /// the provider's `error_summary` when the body is structured.
    async fn api_error(response: reqwest::Response) -> DropboxError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let summary = serde_json::from_str::<ApiErrorBody>(&body)
            .map(|e| e.error_summary)
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or(body);
        DropboxError::Api { status, summary }
    }
}

impl std::fmt::Debug for DropboxClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DropboxClient")
            .field("app_key", &self.credentials.app_key)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl FileStore for DropboxClient {
    async fn create_folder(&self, path: &str) -> Result<(), DropboxError> {
        let token = self.access_token().await?;

        let response = self
            .http
            .post(format!("{}/2/files/create_folder_v2", self.base_url))
            .bearer_auth(&token)
            .json(&json!({ "path": path, "autorename": true }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }
        debug!(path, "folder created");
        Ok(())
    }

    async fn create_shared_link(&self, path: &str) -> Result<String, DropboxError> {
        let token = self.access_token().await?;

        let response = self
            .http
            .post(format!(
                "{}/2/sharing/create_shared_link_with_settings",
                self.base_url
            ))
            .bearer_auth(&token)
            .json(&json!({
                "path": path,
                "settings": { "requested_visibility": "public" }
            }))
            .send()
            .await?;

        if response.status().is_success() {
            let link: SharedLinkResponse = response.json().await?;
            debug!(path, url = %link.url, "shared link created");
            return Ok(link.url);
        }

        let error = Self::api_error(response).await;
        let already_exists = matches!(
            &error,
            DropboxError::Api { summary, .. } if summary.contains("shared_link_already_exists")
        );
        if !already_exists {
            return Err(error);
        }

        // The folder was shared on a previous (retried) invocation; fetch
        // the existing link instead.
        let response = self
            .http
            .post(format!("{}/2/sharing/list_shared_links", self.base_url))
            .bearer_auth(&token)
            .json(&json!({ "path": path, "direct_only": true }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        let list: ListSharedLinksResponse = response.json().await?;
        list.links
            .into_iter()
            .next()
            .map(|link| link.url)
            .ok_or_else(|| DropboxError::MissingSharedLink {
                path: path.to_string(),
            })
    }
}

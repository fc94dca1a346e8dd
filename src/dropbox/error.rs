//! File-store error types.

use thiserror::Error;

/// Errors from the storage collaborator. Surfaced to the webhook caller as
/// a 500; never retried internally.
#[derive(Debug, Error)]
pub enum DropboxError {
    /// The HTTP request itself failed (network, TLS, timeout).
    #[error("storage request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The OAuth token refresh did not yield an access token.
    #[error("storage token refresh failed: {0}")]
    TokenRefresh(String),

    /// The API answered with a non-success status.
    #[error("storage API error (HTTP {status}): {summary}")]
    Api { status: u16, summary: String },

    /// A shared link was reported to exist but could not be retrieved.
    #[error("existing shared link for {path} could not be retrieved")]
    MissingSharedLink { path: String },
}

//! Mailer error types.

use thiserror::Error;

/// Errors from the mail collaborator. Surfaced to the webhook caller as a
/// 500; never retried internally.
#[derive(Debug, Error)]
pub enum SendGridError {
    /// The HTTP request itself failed (network, TLS, timeout).
    #[error("mail request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("mail API error (HTTP {status}): {body}")]
    Api { status: u16, body: String },
}

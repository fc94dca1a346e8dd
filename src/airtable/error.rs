//! Order-store error types.

use thiserror::Error;

/// Errors from the tabular-database collaborator.
///
/// None of these are retried internally; they surface to the webhook caller
/// as a 500 with structured JSON. The tracking provider redelivers webhooks
/// at least once, and the classify/authorize re-check makes the redelivery
/// safe.
#[derive(Debug, Error)]
pub enum AirtableError {
    /// The HTTP request itself failed (network, TLS, timeout).
    #[error("order store request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("order store API error (HTTP {status}): {body}")]
    Api { status: u16, body: String },

    /// A fetched order carries a status string outside the closed lifecycle
    /// enumeration. Data corruption upstream; not actionable here.
    #[error("order {record_id} has unrecognized status {status:?}")]
    UnrecognizedStatus { record_id: String, status: String },
}

//! Mail collaborator: transactional email and marketing-list enrollment.
//!
//! The [`Mailer`] trait is the seam the HTTP handlers depend on; the REST
//! implementation lives in [`client`] and the per-status customer email
//! copy in [`templates`].

mod client;
mod error;
pub mod templates;

use async_trait::async_trait;

pub use client::SendGridClient;
pub use error::SendGridError;

/// One outbound email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
    /// Set on contact-form notifications so staff can reply straight to the
    /// prospect.
    pub reply_to: Option<String>,
}

/// A contact to upsert into the marketing list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketingContact {
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Outbound-mail operations.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Sends one email from the configured sender address.
    async fn send(&self, email: &OutboundEmail) -> Result<(), SendGridError>;

    /// Upserts a contact into the given marketing list.
    async fn upsert_marketing_contact(
        &self,
        contact: &MarketingContact,
        list_id: &str,
    ) -> Result<(), SendGridError>;
}

//! REST client for the mail provider (SendGrid v3).

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::json;
use tracing::debug;

use super::error::SendGridError;
use super::{Mailer, MarketingContact, OutboundEmail};

const DEFAULT_BASE_URL: &str = "https://api.sendgrid.com/v3";

/// A REST client bound to one API key and sender address.
#[derive(Clone)]
pub struct SendGridClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    from_email: String,
}

impl SendGridClient {
    /// Creates a client sending from the given verified address.
    pub fn new(api_key: impl Into<String>, from_email: impl Into<String>) -> Self {
        Self::with_base_url(api_key, from_email, DEFAULT_BASE_URL)
    }

    /// Creates a client pointed at a non-default endpoint (tests).
    pub fn with_base_url(
        api_key: impl Into<String>,
        from_email: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
            from_email: from_email.into(),
        }
    }

    fn auth_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", self.api_key)) {
            headers.insert(AUTHORIZATION, value);
        }
        headers
    }

    async fn check(response: reqwest::Response) -> Result<(), SendGridError> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(SendGridError::Api {
            status: status.as_u16(),
            body,
        })
    }
}

impl std::fmt::Debug for SendGridClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SendGridClient")
            .field("from_email", &self.from_email)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Mailer for SendGridClient {
    async fn send(&self, email: &OutboundEmail) -> Result<(), SendGridError> {
        let mut body = json!({
            "personalizations": [{ "to": [{ "email": email.to }] }],
            "from": { "email": self.from_email },
            "subject": email.subject,
            "content": [{ "type": "text/html", "value": email.html }],
        });
        if let Some(reply_to) = &email.reply_to {
            body["reply_to"] = json!({ "email": reply_to });
        }

        let response = self
            .http
            .post(format!("{}/mail/send", self.base_url))
            .headers(self.auth_headers())
            .json(&body)
            .send()
            .await?;

        Self::check(response).await?;
        debug!(to = %email.to, subject = %email.subject, "email sent");
        Ok(())
    }

    async fn upsert_marketing_contact(
        &self,
        contact: &MarketingContact,
        list_id: &str,
    ) -> Result<(), SendGridError> {
        let body = json!({
            "list_ids": [list_id],
            "contacts": [{
                "email": contact.email,
                "first_name": contact.first_name.as_deref().unwrap_or(""),
                "last_name": contact.last_name.as_deref().unwrap_or(""),
            }],
        });

        let response = self
            .http
            .put(format!("{}/marketing/contacts", self.base_url))
            .headers(self.auth_headers())
            .json(&body)
            .send()
            .await?;

        Self::check(response).await?;
        debug!(email = %contact.email, list_id, "marketing contact upserted");
        Ok(())
    }
}

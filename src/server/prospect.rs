//! Prospect webhook endpoint.
//!
//! A new prospect record triggers marketing-list enrollment, and when the
//! prospect came through the contact form, a notification email to customer
//! service with reply-to set to the prospect. Enrollment without a
//! configured list id is reported as a warning rather than an error so the
//! automation keeps running in partially configured environments.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use super::AppState;
use crate::sendgrid::{MarketingContact, OutboundEmail, SendGridError};
use crate::webhooks::{parse_record_payload, ParseError, RecordPayload};

const CONTACT_FORM_SOURCE: &str = "Contact Form";
const NOTIFICATION_SUBJECT: &str = "Heritage Box Customer Service";

#[derive(Debug, Error)]
pub enum ProspectError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Mail(#[from] SendGridError),
}

impl IntoResponse for ProspectError {
    fn into_response(self) -> Response {
        let status = match &self {
            ProspectError::Parse(_) => StatusCode::BAD_REQUEST,
            ProspectError::Mail(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct ProspectResponse {
    pub success: bool,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<&'static str>,
}

/// The prospect fields the endpoint works with, pulled out of the record.
struct Prospect {
    email: String,
    first_name: Option<String>,
    last_name: Option<String>,
    source: String,
    name: String,
    phone: Option<String>,
    inquiry_type: Option<String>,
    media_types: Option<String>,
    quantity: Option<String>,
    notes: Option<String>,
    chat_transcript: Option<String>,
}

impl Prospect {
    fn from_record(record: &RecordPayload) -> Result<Self, ParseError> {
        let email = record.require_str("Email")?.to_string();
        let first_name = record.field_display("First Name");
        let last_name = record.field_display("Last Name");

        // Prefer the explicit Name field, then first+last, then a marker.
        let name = record
            .field_display("Name")
            .or_else(|| {
                let joined = format!(
                    "{} {}",
                    first_name.as_deref().unwrap_or_default(),
                    last_name.as_deref().unwrap_or_default()
                );
                let joined = joined.trim().to_string();
                (!joined.is_empty()).then_some(joined)
            })
            .unwrap_or_else(|| "Unknown".to_string());

        Ok(Prospect {
            email,
            first_name,
            last_name,
            source: record
                .field_display("Source")
                .unwrap_or_else(|| "Unknown".to_string()),
            name,
            phone: record.field_display("Phone"),
            inquiry_type: record.field_display("Inquiry Type"),
            media_types: record.field_display("Media Types"),
            quantity: record.field_display("Quantity"),
            notes: record.first_of(&["Notes", "Message", "Customer Message"]),
            chat_transcript: record.first_of(&["Chat Transcript", "Chat Transcript (from form)"]),
        })
    }

    /// Renders the customer-service notification for a contact-form inquiry.
    fn notification(&self, to: &str) -> OutboundEmail {
        let subject = match &self.inquiry_type {
            Some(inquiry) => format!("{NOTIFICATION_SUBJECT} - {inquiry}"),
            None => NOTIFICATION_SUBJECT.to_string(),
        };

        let detail_rows: String = [
            ("Name", Some(self.name.as_str())),
            ("Email", Some(self.email.as_str())),
            ("Phone", self.phone.as_deref()),
            ("Inquiry Type", self.inquiry_type.as_deref()),
            ("Media Types", self.media_types.as_deref()),
            ("Quantity", self.quantity.as_deref()),
        ]
        .iter()
        .filter_map(|(label, value)| {
            value.map(|value| {
                format!(
                    "<tr><td style=\"padding:4px 8px; font-weight:bold;\">{label}:</td>\
                     <td style=\"padding:4px 8px;\">{value}</td></tr>"
                )
            })
        })
        .collect();

        let mut message_blocks = String::new();
        if let Some(notes) = &self.notes {
            message_blocks.push_str(&format!(
                "<p style=\"margin:0 0 12px;\"><strong>Message:</strong><br/>{notes}</p>"
            ));
        }
        if let Some(transcript) = &self.chat_transcript {
            message_blocks.push_str(&format!(
                "<p style=\"margin:0 0 12px;\"><strong>Chat Transcript:</strong><br/>{transcript}</p>"
            ));
        }
        if message_blocks.is_empty() {
            message_blocks.push_str("<p>No message provided.</p>");
        }

        let html = format!(
            "<p>You received a new contact form inquiry.</p>\
             <table style=\"border-collapse:collapse;\">{detail_rows}</table>\
             {message_blocks}"
        );

        OutboundEmail {
            to: to.to_string(),
            subject,
            html,
            reply_to: Some(self.email.clone()),
        }
    }
}

/// Prospect webhook handler.
pub async fn prospect_handler(
    State(app_state): State<AppState>,
    body: Bytes,
) -> Result<Json<ProspectResponse>, ProspectError> {
    let record = parse_record_payload(&body)?;
    let prospect = Prospect::from_record(&record)?;

    info!(email = %prospect.email, source = %prospect.source, "enrolling prospect");

    if prospect.source == CONTACT_FORM_SOURCE {
        let notification = prospect.notification(&app_state.config().notification_email);
        app_state.mailer().send(&notification).await?;
        info!(email = %prospect.email, "contact form inquiry forwarded");
    }

    let Some(list_id) = app_state.config().sendgrid_list_id.as_deref() else {
        warn!("SENDGRID_LIST_ID not configured, contact not added to list");
        return Ok(Json(ProspectResponse {
            success: true,
            email: prospect.email,
            warning: Some("SENDGRID_LIST_ID not configured"),
        }));
    };

    let contact = MarketingContact {
        email: prospect.email.clone(),
        first_name: prospect.first_name,
        last_name: prospect.last_name,
    };
    app_state
        .mailer()
        .upsert_marketing_contact(&contact, list_id)
        .await?;

    info!(email = %prospect.email, "prospect enrolled");
    Ok(Json(ProspectResponse {
        success: true,
        email: prospect.email,
        warning: None,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::testing::{test_config, test_state, FakeMailer, FakeOrderStore};
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn request(body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/webhook/new-prospect")
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap()
    }

    fn app(config: crate::config::Config) -> (axum::Router, Arc<FakeMailer>) {
        let mailer = Arc::new(FakeMailer::default());
        let state = test_state(
            config,
            Arc::new(FakeOrderStore::default()),
            mailer.clone(),
            None,
        );
        (crate::server::build_router(state), mailer)
    }

    #[tokio::test]
    async fn enrolls_prospect_into_the_list() {
        let (app, mailer) = app(test_config());

        let response = app
            .oneshot(request(serde_json::json!({
                "record": {
                    "id": "recP1",
                    "fields": {
                        "Email": "jo@example.com",
                        "First Name": "Jo",
                        "Last Name": "Birch",
                        "Source": "Website"
                    }
                }
            })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["email"], "jo@example.com");
        assert!(body.get("warning").is_none());

        let contacts = mailer.contacts.lock().unwrap();
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].0.email, "jo@example.com");
        assert_eq!(contacts[0].0.first_name.as_deref(), Some("Jo"));
        assert_eq!(contacts[0].1, "list-1");
        // Not a contact-form inquiry, so nothing is forwarded.
        assert!(mailer.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn contact_form_inquiry_is_forwarded_with_reply_to() {
        let (app, mailer) = app(test_config());

        let response = app
            .oneshot(request(serde_json::json!({
                "record": {
                    "id": "recP2",
                    "fields": {
                        "Email": "sam@example.com",
                        "First Name": "Sam",
                        "Source": "Contact Form",
                        "Inquiry Type": "Pricing",
                        "Quantity": 12,
                        "Message": "How much for 12 tapes?"
                    }
                }
            })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "info@example.com");
        assert_eq!(sent[0].subject, "Heritage Box Customer Service - Pricing");
        assert_eq!(sent[0].reply_to.as_deref(), Some("sam@example.com"));
        assert!(sent[0].html.contains("How much for 12 tapes?"));
        assert!(sent[0].html.contains("Quantity"));
        assert!(sent[0].html.contains("12"));
        // Enrollment still happens after forwarding.
        assert_eq!(mailer.contacts.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn contact_form_without_message_notes_that() {
        let (app, mailer) = app(test_config());

        app.oneshot(request(serde_json::json!({
            "record": {
                "id": "recP3",
                "fields": {
                    "Email": "lee@example.com",
                    "Source": "Contact Form"
                }
            }
        })))
        .await
        .unwrap();

        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, "Heritage Box Customer Service");
        assert!(sent[0].html.contains("No message provided."));
    }

    #[tokio::test]
    async fn missing_list_id_is_a_warning_not_an_error() {
        let mut config = test_config();
        config.sendgrid_list_id = None;
        let (app, mailer) = app(config);

        let response = app
            .oneshot(request(serde_json::json!({
                "record": { "id": "recP4", "fields": { "Email": "a@example.com" } }
            })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["warning"], "SENDGRID_LIST_ID not configured");
        assert!(mailer.contacts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_email_is_400() {
        let (app, _mailer) = app(test_config());

        let response = app
            .oneshot(request(serde_json::json!({
                "record": { "id": "recP5", "fields": { "First Name": "Jo" } }
            })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn mailer_outage_is_500() {
        let mailer = Arc::new(FakeMailer {
            fail: true,
            ..Default::default()
        });
        let state = test_state(
            test_config(),
            Arc::new(FakeOrderStore::default()),
            mailer,
            None,
        );
        let app = crate::server::build_router(state);

        let response = app
            .oneshot(request(serde_json::json!({
                "record": { "id": "recP6", "fields": { "Email": "a@example.com" } }
            })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn name_falls_back_to_first_and_last() {
        let record = crate::webhooks::parse_record_payload(
            br#"{"record": {"id": "r", "fields": {"Email": "a@b.c", "First Name": "Jo", "Last Name": "Birch"}}}"#,
        )
        .unwrap();
        let prospect = Prospect::from_record(&record).unwrap();
        assert_eq!(prospect.name, "Jo Birch");
    }

    #[test]
    fn name_falls_back_to_unknown() {
        let record = crate::webhooks::parse_record_payload(
            br#"{"record": {"id": "r", "fields": {"Email": "a@b.c"}}}"#,
        )
        .unwrap();
        let prospect = Prospect::from_record(&record).unwrap();
        assert_eq!(prospect.name, "Unknown");
        assert_eq!(prospect.source, "Unknown");
    }
}

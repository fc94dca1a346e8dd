//! Status-change email endpoint.
//!
//! The database automation fires this when an order's lifecycle status
//! changes; the handler renders the matching customer email and sends it.
//! A status with no template is a successful no-op, not an error, so the
//! automation never retries it.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use super::AppState;
use crate::sendgrid::templates::{status_email, TemplateContext};
use crate::sendgrid::{OutboundEmail, SendGridError};
use crate::types::OrderStatus;
use crate::webhooks::{parse_record_payload, ParseError};

#[derive(Debug, Error)]
pub enum StatusEmailError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Mail(#[from] SendGridError),
}

impl IntoResponse for StatusEmailError {
    fn into_response(self) -> Response {
        let status = match &self {
            StatusEmailError::Parse(_) => StatusCode::BAD_REQUEST,
            StatusEmailError::Mail(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct StatusEmailResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<&'static str>,
}

/// Status-change email handler.
pub async fn status_email_handler(
    State(app_state): State<AppState>,
    body: Bytes,
) -> Result<Json<StatusEmailResponse>, StatusEmailError> {
    let record = parse_record_payload(&body)?;
    let customer_email = record.require_str("Customer Email")?.to_string();

    // The automation sends both the display name and a stable key; the key
    // is what selects the template. An unrecognized key means no email.
    let status = record
        .field_str("Ops Status Key")
        .and_then(OrderStatus::parse);

    let Some(status) = status else {
        info!(
            key = record.field_str("Ops Status Key").unwrap_or("-"),
            "no email template for status"
        );
        return Ok(Json(StatusEmailResponse {
            success: true,
            message: Some("No email template for this status"),
            status: None,
        }));
    };

    let ctx = TemplateContext {
        customer_name: record
            .field_display("Customer Name")
            .unwrap_or_else(|| "Valued Customer".to_string()),
        order_number: record
            .field_display("Order Number")
            .unwrap_or_else(|| "N/A".to_string()),
        tracking_number: record.field_display("Active Tracking Number"),
        dropbox_link: record.field_display("Dropbox Link"),
    };

    let Some(template) = status_email(status, &ctx) else {
        // Every lifecycle status currently has copy; this guards template
        // removal without turning it into a handler error.
        return Ok(Json(StatusEmailResponse {
            success: true,
            message: Some("No email template for this status"),
            status: None,
        }));
    };

    let email = OutboundEmail {
        to: customer_email.clone(),
        subject: template.subject,
        html: template.html,
        reply_to: None,
    };
    app_state.mailer().send(&email).await?;

    info!(to = %customer_email, status = %status, "status update email sent");
    Ok(Json(StatusEmailResponse {
        success: true,
        message: None,
        status: Some(status.name()),
    }))
}

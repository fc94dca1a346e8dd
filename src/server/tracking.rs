//! Tracking webhook endpoint.
//!
//! The shipment-tracking provider delivers one carrier scan per call.
//! Processing order: verify the signature over the raw body, parse, look
//! the order up by tracking number, classify the scan against the order's
//! lifecycle state, check the fixed transition table, and only then write
//! the new status back. Delivery is at-least-once; a redelivered scan finds
//! the order already advanced and falls out at classification, so no dedup
//! state is needed.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use super::AppState;
use crate::airtable::AirtableError;
use crate::reconcile::{classify_tracking_event, is_allowed_transition};
use crate::types::OrderStatus;
use crate::webhooks::{parse_tracking_update, verify_signature, ParseError};

/// Header carrying the provider's HMAC-SHA256 hex digest.
const HEADER_SIGNATURE: &str = "x-shippo-signature";

/// Errors that abort tracking-webhook processing.
#[derive(Debug, Error)]
pub enum TrackingError {
    /// Signature missing or wrong (only when verification is required).
    #[error("invalid signature")]
    InvalidSignature,

    /// Malformed payload; rejected before the reconciler runs.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The order store failed.
    #[error(transparent)]
    Store(#[from] AirtableError),
}

impl IntoResponse for TrackingError {
    fn into_response(self) -> Response {
        let status = match &self {
            TrackingError::InvalidSignature => StatusCode::FORBIDDEN,
            TrackingError::Parse(_) => StatusCode::BAD_REQUEST,
            TrackingError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

/// Response body for the tracking webhook. Field names match what the
/// downstream automations already consume.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_status: Option<OrderStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempted_status: Option<OrderStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_status: Option<OrderStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_status: Option<OrderStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking_number: Option<String>,
}

impl TrackingResponse {
    fn no_order() -> Self {
        TrackingResponse {
            success: true,
            message: Some("No order found".to_string()),
            order: None,
            current_status: None,
            attempted_status: None,
            previous_status: None,
            new_status: None,
            tracking_number: None,
        }
    }

    fn no_change(order: String, current: OrderStatus) -> Self {
        TrackingResponse {
            success: true,
            message: Some("No status change needed".to_string()),
            order: Some(order),
            current_status: Some(current),
            attempted_status: None,
            previous_status: None,
            new_status: None,
            tracking_number: None,
        }
    }

    fn rejected(order: String, current: OrderStatus, attempted: OrderStatus) -> Self {
        TrackingResponse {
            success: false,
            message: Some("Invalid status transition".to_string()),
            order: Some(order),
            current_status: Some(current),
            attempted_status: Some(attempted),
            previous_status: None,
            new_status: None,
            tracking_number: None,
        }
    }

    fn updated(
        order: String,
        previous: OrderStatus,
        new: OrderStatus,
        tracking_number: String,
    ) -> Self {
        TrackingResponse {
            success: true,
            message: None,
            order: Some(order),
            current_status: None,
            attempted_status: None,
            previous_status: Some(previous),
            new_status: Some(new),
            tracking_number: Some(tracking_number),
        }
    }
}

/// Tracking webhook handler.
pub async fn tracking_handler(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<TrackingResponse>, TrackingError> {
    let config = app_state.config();

    // Verify the signature over the raw body before any parsing or I/O.
    // When verification is not required (unconfigured/dev environments)
    // the request is accepted as-is; that permissive default is an explicit
    // configuration choice, not an oversight.
    if config.require_signature {
        // No secret means nothing to verify against; reject rather than
        // fall back to the empty key, which any caller could sign with.
        let Some(secret) = config.shippo_webhook_secret.as_deref() else {
            warn!("signature required but no webhook secret configured");
            return Err(TrackingError::InvalidSignature);
        };
        let signature = headers
            .get(HEADER_SIGNATURE)
            .and_then(|v| v.to_str().ok())
            .ok_or(TrackingError::InvalidSignature)?;
        if !verify_signature(&body, signature, secret.as_bytes()) {
            warn!("invalid tracking webhook signature");
            return Err(TrackingError::InvalidSignature);
        }
    }

    let event = parse_tracking_update(&body)?;
    info!(
        tracking = %event.tracking_number,
        status = %event.carrier_status,
        substatus = event.substatus.as_deref().unwrap_or("-"),
        "tracking update received"
    );

    let Some(order) = app_state
        .orders()
        .find_order_by_tracking(&event.tracking_number)
        .await?
    else {
        info!(tracking = %event.tracking_number, "no order for tracking number");
        return Ok(Json(TrackingResponse::no_order()));
    };

    let order_label = order.label().to_string();
    let current = order.current_status;

    let Some(proposed) =
        classify_tracking_event(&order, &event.tracking_number, &event.carrier_status)
    else {
        info!(order = %order_label, current = %current, "no status change needed");
        return Ok(Json(TrackingResponse::no_change(order_label, current)));
    };

    if !is_allowed_transition(current, proposed) {
        warn!(
            order = %order_label,
            from = %current,
            to = %proposed,
            "classified transition rejected by transition table"
        );
        return Ok(Json(TrackingResponse::rejected(
            order_label,
            current,
            proposed,
        )));
    }

    app_state
        .orders()
        .update_order_status(&order.record_id, proposed, Some(&event.tracking_number))
        .await?;

    info!(order = %order_label, from = %current, to = %proposed, "order status updated");
    Ok(Json(TrackingResponse::updated(
        order_label,
        current,
        proposed,
        event.tracking_number.to_string(),
    )))
}

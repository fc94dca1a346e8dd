//! Webhook payload parsing.
//!
//! This module parses the raw JSON bodies of the inbound webhooks into typed
//! values. Two payload shapes arrive here:
//!
//! - the shipment-tracking provider's update:
//!   `{"data": {"tracking_number": ..., "tracking_status": {...}}}`
//! - the database automation envelope used by the other three hooks:
//!   `{"record": {"id": ..., "fields": {...}}}`
//!
//! Raw structures use `Option` liberally and required fields are validated
//! explicitly, so a missing field produces a precise [`ParseError`] rather
//! than an opaque serde message. Unknown carrier statuses are *not* errors;
//! they parse to [`CarrierStatus::Other`] and are ignored downstream.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::types::{CarrierStatus, RecordId, TrackingEvent, TrackingNumber};

/// Error type for webhook parsing failures.
///
/// All variants map to HTTP 400: malformed input is rejected before any
/// business logic runs.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON deserialization failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// A required field is missing or empty.
    #[error("missing required field: {0}")]
    MissingField(&'static str),
}

// ============================================================================
// Tracking updates
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawTrackingPayload {
    data: Option<RawTrackingData>,
}

#[derive(Debug, Deserialize)]
struct RawTrackingData {
    tracking_number: Option<String>,
    tracking_status: Option<RawTrackingStatus>,
}

#[derive(Debug, Deserialize)]
struct RawTrackingStatus {
    status: Option<String>,
    substatus: Option<String>,
    status_date: Option<DateTime<Utc>>,
}

/// Parses a tracking-update payload into a [`TrackingEvent`].
///
/// Missing `tracking_number` or `status` is a [`ParseError::MissingField`];
/// these are the malformed-input cases that must never reach the
/// reconciler.
pub fn parse_tracking_update(payload: &[u8]) -> Result<TrackingEvent, ParseError> {
    let raw: RawTrackingPayload = serde_json::from_slice(payload)?;

    let data = raw.data.ok_or(ParseError::MissingField("data"))?;
    let tracking_number = data
        .tracking_number
        .filter(|s| !s.is_empty())
        .ok_or(ParseError::MissingField("tracking_number"))?;
    let status = data
        .tracking_status
        .ok_or(ParseError::MissingField("tracking_status"))?;
    let carrier_status = status
        .status
        .filter(|s| !s.is_empty())
        .ok_or(ParseError::MissingField("tracking_status.status"))?;

    Ok(TrackingEvent {
        tracking_number: TrackingNumber::new(tracking_number),
        carrier_status: CarrierStatus::from(carrier_status),
        substatus: status.substatus,
        status_date: status.status_date,
    })
}

// ============================================================================
// Database automation records
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawRecordPayload {
    record: Option<RawRecord>,
}

#[derive(Debug, Deserialize)]
struct RawRecord {
    id: Option<String>,
    fields: Option<serde_json::Map<String, Value>>,
}

/// A database record as delivered by an automation webhook: the row id and
/// its fields, untyped.
///
/// Field names in the database are free-form ("Customer Email", "Order
/// Number", ...), so fields stay as a JSON map and each endpoint extracts
/// what it needs through the typed accessors below.
#[derive(Debug, Clone)]
pub struct RecordPayload {
    pub id: RecordId,
    fields: serde_json::Map<String, Value>,
}

impl RecordPayload {
    /// Returns a string field, or `None` when absent, empty, or non-text.
    pub fn field_str(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Returns a field rendered as display text. Strings pass through;
    /// numbers are formatted (quantities arrive as numbers from the
    /// database); everything else is `None`.
    pub fn field_display(&self, name: &str) -> Option<String> {
        match self.fields.get(name)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Returns the first present field among `names`, as display text.
    pub fn first_of(&self, names: &[&str]) -> Option<String> {
        names.iter().find_map(|name| self.field_display(name))
    }

    /// Returns a required string field or [`ParseError::MissingField`].
    pub fn require_str(&self, name: &'static str) -> Result<&str, ParseError> {
        self.field_str(name).ok_or(ParseError::MissingField(name))
    }
}

/// Parses a database automation envelope (`{"record": {...}}`).
///
/// The envelope and record id are required; individual fields are validated
/// by each endpoint against its own requirements.
pub fn parse_record_payload(payload: &[u8]) -> Result<RecordPayload, ParseError> {
    let raw: RawRecordPayload = serde_json::from_slice(payload)?;

    let record = raw.record.ok_or(ParseError::MissingField("record"))?;
    let id = record
        .id
        .filter(|s| !s.is_empty())
        .ok_or(ParseError::MissingField("record.id"))?;

    Ok(RecordPayload {
        id: RecordId::new(id),
        fields: record.fields.unwrap_or_default(),
    })
}

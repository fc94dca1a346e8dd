//! Shipment-tracking event types.
//!
//! A [`TrackingEvent`] is the ephemeral payload of one tracking webhook call:
//! it is classified against an order snapshot and then discarded. Nothing in
//! it is persisted directly.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::TrackingNumber;

/// Normalized carrier scan status from the shipment-tracking provider.
///
/// The provider emits many statuses (`PRE_TRANSIT`, `FAILURE`, `RETURNED`,
/// ...); the reconciler only acts on transit and delivery scans, so
/// everything else is preserved verbatim in `Other` and ignored downstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CarrierStatus {
    /// The shipment is moving (`TRANSIT`).
    Transit,
    /// The shipment is moving (`IN_TRANSIT`; some carriers use this spelling).
    InTransit,
    /// The shipment was delivered (`DELIVERED`).
    Delivered,
    /// Any other status; never triggers a transition.
    Other(String),
}

impl CarrierStatus {
    /// Returns true for either spelling of an in-transit scan.
    pub fn is_transit(&self) -> bool {
        matches!(self, CarrierStatus::Transit | CarrierStatus::InTransit)
    }

    /// Returns true for a delivery scan.
    pub fn is_delivered(&self) -> bool {
        matches!(self, CarrierStatus::Delivered)
    }

    /// The provider's wire form of this status.
    pub fn as_str(&self) -> &str {
        match self {
            CarrierStatus::Transit => "TRANSIT",
            CarrierStatus::InTransit => "IN_TRANSIT",
            CarrierStatus::Delivered => "DELIVERED",
            CarrierStatus::Other(s) => s,
        }
    }
}

impl From<String> for CarrierStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "TRANSIT" => CarrierStatus::Transit,
            "IN_TRANSIT" => CarrierStatus::InTransit,
            "DELIVERED" => CarrierStatus::Delivered,
            _ => CarrierStatus::Other(s),
        }
    }
}

impl From<CarrierStatus> for String {
    fn from(status: CarrierStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for CarrierStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One tracking update, as delivered by the provider's webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingEvent {
    /// The tracking number the scan belongs to.
    pub tracking_number: TrackingNumber,

    /// The normalized carrier status.
    pub carrier_status: CarrierStatus,

    /// Provider substatus detail (e.g. `"package_accepted"`), when present.
    pub substatus: Option<String>,

    /// When the carrier recorded the scan, when present.
    pub status_date: Option<chrono::DateTime<chrono::Utc>>,
}

//! Order lifecycle types.
//!
//! An order moves through a fixed fulfillment pipeline:
//!
//! ```text
//! Pending -> Kit Sent -> Media Received -> Digitizing -> Quality Check
//!         -> Shipping Back -> Complete
//! ```
//!
//! `Canceled` is reachable from any state, but only by a human operator
//! through the external system, never by this service. The authoritative
//! state lives in the external database; [`OrderSnapshot`] is a read-only
//! view taken at the start of a webhook invocation.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{OrderNumber, RecordId, TrackingNumber};

/// An order's lifecycle state.
///
/// The serialized form matches the display names stored in the database
/// (`"Kit Sent"`, not `"KIT_SENT"`). The upper-snake key form used by the
/// email templates is available via [`OrderStatus::key`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    #[serde(rename = "Pending")]
    Pending,
    #[serde(rename = "Kit Sent")]
    KitSent,
    #[serde(rename = "Media Received")]
    MediaReceived,
    #[serde(rename = "Digitizing")]
    Digitizing,
    #[serde(rename = "Quality Check")]
    QualityCheck,
    #[serde(rename = "Shipping Back")]
    ShippingBack,
    #[serde(rename = "Complete")]
    Complete,
    #[serde(rename = "Canceled")]
    Canceled,
}

impl OrderStatus {
    /// All lifecycle states, in pipeline order.
    pub const ALL: [OrderStatus; 8] = [
        OrderStatus::Pending,
        OrderStatus::KitSent,
        OrderStatus::MediaReceived,
        OrderStatus::Digitizing,
        OrderStatus::QualityCheck,
        OrderStatus::ShippingBack,
        OrderStatus::Complete,
        OrderStatus::Canceled,
    ];

    /// The display name stored in the database (e.g. `"Kit Sent"`).
    pub fn name(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::KitSent => "Kit Sent",
            OrderStatus::MediaReceived => "Media Received",
            OrderStatus::Digitizing => "Digitizing",
            OrderStatus::QualityCheck => "Quality Check",
            OrderStatus::ShippingBack => "Shipping Back",
            OrderStatus::Complete => "Complete",
            OrderStatus::Canceled => "Canceled",
        }
    }

    /// The upper-snake key form used to select email templates
    /// (e.g. `"KIT_SENT"`).
    pub fn key(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::KitSent => "KIT_SENT",
            OrderStatus::MediaReceived => "MEDIA_RECEIVED",
            OrderStatus::Digitizing => "DIGITIZING",
            OrderStatus::QualityCheck => "QUALITY_CHECK",
            OrderStatus::ShippingBack => "SHIPPING_BACK",
            OrderStatus::Complete => "COMPLETE",
            OrderStatus::Canceled => "CANCELED",
        }
    }

    /// Parses either the display name (`"Kit Sent"`) or the key form
    /// (`"KIT_SENT"`). Returns `None` for anything else.
    pub fn parse(s: &str) -> Option<OrderStatus> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.name() == s || status.key() == s)
    }

    /// Returns true for states with no outgoing transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Complete | OrderStatus::Canceled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Which of the three stored tracking-number fields a number was found in.
///
/// Slot identity is nominal only: the outbound and return slots are known to
/// be swapped by upstream data entry, so this is used for diagnostic logging
/// and the one disambiguation the classifier needs (the inbound slot while
/// the kit is out). It is never trusted to indicate shipment direction on
/// its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackingSlot {
    /// Slot 1: kit shipped to the customer (nominally).
    Outbound,
    /// Slot 2: customer's media shipped to us.
    Inbound,
    /// Slot 3: originals shipped back to the customer (nominally).
    Return,
}

impl fmt::Display for TrackingSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TrackingSlot::Outbound => "outbound (slot 1)",
            TrackingSlot::Inbound => "inbound (slot 2)",
            TrackingSlot::Return => "return (slot 3)",
        };
        write!(f, "{}", label)
    }
}

/// A read-only snapshot of an order, as fetched from the database at the
/// start of a webhook invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSnapshot {
    /// The database record id, used for writes back to the same row.
    pub record_id: RecordId,

    /// The customer-facing order number, when set.
    pub order_number: Option<OrderNumber>,

    /// The order's current lifecycle state.
    pub current_status: OrderStatus,

    /// Slot 1: nominally the kit-to-customer label.
    pub outbound_tracking: Option<TrackingNumber>,

    /// Slot 2: nominally the media-to-us label.
    pub inbound_tracking: Option<TrackingNumber>,

    /// Slot 3: nominally the originals-to-customer label.
    pub return_tracking: Option<TrackingNumber>,
}

impl OrderSnapshot {
    /// Returns which slot holds the given tracking number, if any.
    pub fn slot_for(&self, tracking: &TrackingNumber) -> Option<TrackingSlot> {
        if self.outbound_tracking.as_ref() == Some(tracking) {
            Some(TrackingSlot::Outbound)
        } else if self.inbound_tracking.as_ref() == Some(tracking) {
            Some(TrackingSlot::Inbound)
        } else if self.return_tracking.as_ref() == Some(tracking) {
            Some(TrackingSlot::Return)
        } else {
            None
        }
    }

    /// Returns a display label for the order, preferring the order number.
    pub fn label(&self) -> &str {
        self.order_number
            .as_ref()
            .map(|n| n.as_str())
            .unwrap_or_else(|| self.record_id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_both_forms() {
        assert_eq!(OrderStatus::parse("Kit Sent"), Some(OrderStatus::KitSent));
        assert_eq!(OrderStatus::parse("KIT_SENT"), Some(OrderStatus::KitSent));
        assert_eq!(OrderStatus::parse("Pending"), Some(OrderStatus::Pending));
        assert_eq!(OrderStatus::parse("kit sent"), None);
        assert_eq!(OrderStatus::parse(""), None);
    }

    #[test]
    fn name_and_key_roundtrip_for_all_states() {
        for status in OrderStatus::ALL {
            assert_eq!(OrderStatus::parse(status.name()), Some(status));
            assert_eq!(OrderStatus::parse(status.key()), Some(status));
        }
    }

    #[test]
    fn serde_uses_display_names() {
        let json = serde_json::to_string(&OrderStatus::ShippingBack).unwrap();
        assert_eq!(json, "\"Shipping Back\"");

        let parsed: OrderStatus = serde_json::from_str("\"Quality Check\"").unwrap();
        assert_eq!(parsed, OrderStatus::QualityCheck);
    }

    #[test]
    fn terminal_states() {
        assert!(OrderStatus::Complete.is_terminal());
        assert!(OrderStatus::Canceled.is_terminal());
        assert!(!OrderStatus::Pending.is_terminal());
        assert!(!OrderStatus::ShippingBack.is_terminal());
    }

    fn snapshot_with_slots() -> OrderSnapshot {
        OrderSnapshot {
            record_id: RecordId::new("rec1"),
            order_number: Some(OrderNumber::new("HB-1001")),
            current_status: OrderStatus::KitSent,
            outbound_tracking: Some(TrackingNumber::from("TRK1")),
            inbound_tracking: Some(TrackingNumber::from("TRK2")),
            return_tracking: Some(TrackingNumber::from("TRK3")),
        }
    }

    #[test]
    fn slot_for_finds_each_slot() {
        let order = snapshot_with_slots();
        assert_eq!(
            order.slot_for(&TrackingNumber::from("TRK1")),
            Some(TrackingSlot::Outbound)
        );
        assert_eq!(
            order.slot_for(&TrackingNumber::from("TRK2")),
            Some(TrackingSlot::Inbound)
        );
        assert_eq!(
            order.slot_for(&TrackingNumber::from("TRK3")),
            Some(TrackingSlot::Return)
        );
        assert_eq!(order.slot_for(&TrackingNumber::from("TRK9")), None);
    }

    #[test]
    fn label_prefers_order_number() {
        let order = snapshot_with_slots();
        assert_eq!(order.label(), "HB-1001");

        let mut anonymous = order;
        anonymous.order_number = None;
        assert_eq!(anonymous.label(), "rec1");
    }
}

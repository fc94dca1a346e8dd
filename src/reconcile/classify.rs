//! Classification of tracking events against an order's lifecycle state.
//!
//! The three stored tracking slots are nominally tied to shipment legs
//! (kit out, media in, originals back), but the outbound and return slots
//! are known to arrive swapped from upstream data entry. Slot identity is
//! therefore untrusted; the order's *current lifecycle state* is the
//! reliable signal for what a scan means. The one exception is a delivery
//! scan while the kit is out, where the inbound slot disambiguates media
//! arriving at the facility from anything else.

use tracing::debug;

use crate::types::{CarrierStatus, OrderSnapshot, OrderStatus, TrackingNumber};

/// Decides whether a tracking scan should advance the order, and to where.
///
/// Pure classification over the snapshot; no mutation, no I/O. Rules are
/// evaluated in order and the first match wins:
///
/// 1. Transit scan on a `Pending` order ⇒ the kit is on its way out
///    (`Kit Sent`).
/// 2. Transit scan on a `Quality Check` or `Digitizing` order ⇒ the
///    originals are heading back (`Shipping Back`).
/// 3. Delivery scan on a `Kit Sent` order ⇒ `Media Received`, but only when
///    the scanned number is the inbound slot; a delivery on any other
///    number while the kit is out is not actionable.
/// 4. Delivery scan on a `Shipping Back` order ⇒ `Complete`, regardless of
///    slot.
///
/// Everything else is `None`: a valid no-op, not an error. In particular an
/// order already in the target state yields `None` (rule 1 requires
/// `Pending`, rule 3 requires `Kit Sent`, ...), which is what makes
/// redelivered webhooks harmless.
pub fn classify_tracking_event(
    order: &OrderSnapshot,
    tracking_number: &TrackingNumber,
    carrier_status: &CarrierStatus,
) -> Option<OrderStatus> {
    // Slot identity is logged for diagnosis but (except for rule 3) never
    // drives the decision.
    match order.slot_for(tracking_number) {
        Some(slot) => debug!(order = order.label(), %slot, "tracking number found in slot"),
        None => debug!(order = order.label(), "tracking number not in any slot"),
    }

    if carrier_status.is_transit() {
        return match order.current_status {
            // The only shipment that can move while the order is pending is
            // the outbound kit.
            OrderStatus::Pending => Some(OrderStatus::KitSent),
            // Once originals are staged for return, any transit scan means
            // the return shipment is moving.
            OrderStatus::QualityCheck | OrderStatus::Digitizing => Some(OrderStatus::ShippingBack),
            _ => None,
        };
    }

    if carrier_status.is_delivered() {
        return match order.current_status {
            OrderStatus::KitSent => {
                if order.inbound_tracking.as_ref() == Some(tracking_number) {
                    Some(OrderStatus::MediaReceived)
                } else {
                    // A delivery scan on a non-inbound number while the
                    // order is mid-kit (e.g. the kit itself arriving at the
                    // customer) does not advance anything.
                    debug!(
                        order = order.label(),
                        tracking = %tracking_number,
                        "delivery on non-inbound tracking while kit is out; ignoring"
                    );
                    None
                }
            }
            OrderStatus::ShippingBack => Some(OrderStatus::Complete),
            _ => None,
        };
    }

    // Pre-transit, failure, returned, and every other carrier status.
    None
}

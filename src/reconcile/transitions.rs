//! The fixed transition table for tracking-driven status changes.
//!
//! Classification ([`super::classify_tracking_event`]) determines what a
//! scan *means*; this table determines whether the tracking subsystem is
//! *authorized* to apply it. Both must pass before the database is touched.
//!
//! Manual transitions (`Media Received -> Digitizing -> Quality Check`, and
//! `Canceled` from anywhere) belong to human operators in the external
//! system and are deliberately absent here.

use crate::types::OrderStatus;

/// The `(from, to)` pairs the tracking subsystem may apply.
///
/// Note the asymmetry with the classifier: a transit scan on a `Digitizing`
/// order classifies to `Shipping Back`, but `Digitizing` has no entry here,
/// so that proposal is rejected. The table is the stricter of the two
/// guards and acts as a safety net against premature return transitions.
pub const ALLOWED_TRANSITIONS: [(OrderStatus, OrderStatus); 4] = [
    (OrderStatus::Pending, OrderStatus::KitSent),
    (OrderStatus::KitSent, OrderStatus::MediaReceived),
    (OrderStatus::QualityCheck, OrderStatus::ShippingBack),
    (OrderStatus::ShippingBack, OrderStatus::Complete),
];

/// Returns true when the tracking subsystem may move an order from `from`
/// to `to`. Any pair not in [`ALLOWED_TRANSITIONS`] is `false`.
pub fn is_allowed_transition(from: OrderStatus, to: OrderStatus) -> bool {
    ALLOWED_TRANSITIONS.contains(&(from, to))
}

//! Core domain types for the fulfillment relay.
//!
//! This module contains the shared vocabulary: identifier newtypes, the
//! order lifecycle enum and snapshot, and tracking-event types.

pub mod ids;
pub mod order;
pub mod tracking;

pub use ids::{OrderNumber, RecordId, TrackingNumber};
pub use order::{OrderSnapshot, OrderStatus, TrackingSlot};
pub use tracking::{CarrierStatus, TrackingEvent};

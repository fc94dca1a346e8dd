//! Order store: the tabular database that owns all order state.
//!
//! The [`OrderStore`] trait is the seam the HTTP handlers depend on; the
//! REST implementation lives in [`client`]. Tests substitute in-memory
//! fakes.

mod client;
mod error;

use async_trait::async_trait;

use crate::types::{OrderSnapshot, OrderStatus, RecordId, TrackingNumber};

pub use client::AirtableClient;
pub use error::AirtableError;

/// Read/write access to orders in the external database.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Finds at most one order whose three tracking slots contain the given
    /// number. Multiple matches are not disambiguated; first match wins.
    async fn find_order_by_tracking(
        &self,
        tracking: &TrackingNumber,
    ) -> Result<Option<OrderSnapshot>, AirtableError>;

    /// Persists a new lifecycle status, and the active tracking number when
    /// one accompanied the transition. Callers must have passed both
    /// classification and the transition table first.
    async fn update_order_status(
        &self,
        record_id: &RecordId,
        status: OrderStatus,
        tracking: Option<&TrackingNumber>,
    ) -> Result<(), AirtableError>;

    /// Writes a single field on an order record (e.g. the deliverable
    /// folder link).
    async fn set_order_field(
        &self,
        record_id: &RecordId,
        field: &str,
        value: &str,
    ) -> Result<(), AirtableError>;
}

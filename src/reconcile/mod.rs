//! Pure reconciliation logic for tracking-driven order transitions.
//!
//! This is the functional core of the service: given a tracking scan and an
//! order snapshot, decide whether and how the order should advance. All I/O
//! (order lookup, the database write, the webhook plumbing) lives in
//! `server` and the collaborator modules; nothing here blocks, allocates
//! shared state, or retains anything across calls.

pub mod classify;
pub mod transitions;

pub use classify::classify_tracking_event;
pub use transitions::{is_allowed_transition, ALLOWED_TRANSITIONS};

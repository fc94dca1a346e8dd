//! Fulfillment Relay - webhook hub connecting the order database, carrier
//! tracking, outbound email, and deliverable storage.
//!
//! This library provides the domain types, the order-status reconciler, and
//! the HTTP surface that ties them to the external services.

pub mod airtable;
pub mod config;
pub mod dropbox;
pub mod reconcile;
pub mod sendgrid;
pub mod server;
pub mod types;
pub mod webhooks;

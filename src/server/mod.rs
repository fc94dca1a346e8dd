//! HTTP server for the fulfillment relay.
//!
//! This module implements the webhook surface:
//!
//! - `POST /webhook/shippo-tracking` - carrier scan updates (signed)
//! - `POST /webhook/new-prospect` - marketing enrollment + contact-form relay
//! - `POST /webhook/order-status-changed` - customer status emails
//! - `POST /webhook/create-dropbox-folder` - deliverable folder provisioning
//! - `GET /health` - liveness probe
//! - `GET /` - service descriptor
//!
//! Handlers hold no state of their own; everything they need arrives via
//! [`AppState`], and the collaborators behind it are trait objects so tests
//! can substitute in-memory fakes.

use std::sync::Arc;

pub mod health;
pub mod prospect;
pub mod status_email;
pub mod storage_folder;
pub mod tracking;

#[cfg(test)]
pub(crate) mod testing;

pub use health::{health_handler, root_handler};
pub use prospect::prospect_handler;
pub use status_email::status_email_handler;
pub use storage_folder::storage_folder_handler;
pub use tracking::tracking_handler;

use crate::airtable::{AirtableClient, OrderStore};
use crate::config::Config;
use crate::dropbox::{DropboxClient, FileStore};
use crate::sendgrid::{Mailer, SendGridClient};

/// Shared application state, passed to all handlers via Axum's `State`
/// extractor.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    orders: Arc<dyn OrderStore>,
    mailer: Arc<dyn Mailer>,
    /// Absent when storage credentials are not configured; the folder
    /// endpoint reports a configuration error in that case.
    files: Option<Arc<dyn FileStore>>,
}

impl AppState {
    /// Creates state with explicit collaborators (tests use fakes here).
    pub fn new(
        config: Config,
        orders: Arc<dyn OrderStore>,
        mailer: Arc<dyn Mailer>,
        files: Option<Arc<dyn FileStore>>,
    ) -> Self {
        AppState {
            inner: Arc::new(AppStateInner {
                config,
                orders,
                mailer,
                files,
            }),
        }
    }

    /// Creates state backed by the real REST collaborators.
    pub fn from_config(config: Config) -> Self {
        let orders: Arc<dyn OrderStore> = Arc::new(AirtableClient::new(
            config.airtable_api_key.clone(),
            config.airtable_base_id.clone(),
        ));
        let mailer: Arc<dyn Mailer> = Arc::new(SendGridClient::new(
            config.sendgrid_api_key.clone(),
            config.sendgrid_from_email.clone(),
        ));
        let files: Option<Arc<dyn FileStore>> = config
            .storage
            .clone()
            .map(|credentials| Arc::new(DropboxClient::new(credentials)) as Arc<dyn FileStore>);

        Self::new(config, orders, mailer, files)
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub fn orders(&self) -> &dyn OrderStore {
        self.inner.orders.as_ref()
    }

    pub fn mailer(&self) -> &dyn Mailer {
        self.inner.mailer.as_ref()
    }

    pub fn files(&self) -> Option<&dyn FileStore> {
        self.inner.files.as_deref()
    }
}

/// Builds the axum Router with all endpoints.
pub fn build_router(app_state: AppState) -> axum::Router {
    use axum::routing::{get, post};

    axum::Router::new()
        .route("/webhook/shippo-tracking", post(tracking_handler))
        .route("/webhook/new-prospect", post(prospect_handler))
        .route("/webhook/order-status-changed", post(status_email_handler))
        .route("/webhook/create-dropbox-folder", post(storage_folder_handler))
        .route("/health", get(health_handler))
        .route("/", get(root_handler))
        .with_state(app_state)
}

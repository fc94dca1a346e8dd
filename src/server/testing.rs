//! In-memory collaborator fakes for handler tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::airtable::{AirtableError, OrderStore};
use crate::config::Config;
use crate::dropbox::{DropboxError, FileStore};
use crate::sendgrid::{Mailer, MarketingContact, OutboundEmail, SendGridError};
use crate::types::{OrderSnapshot, OrderStatus, RecordId, TrackingNumber};

use super::AppState;

/// A configuration with placeholder credentials and signature checking off.
pub fn test_config() -> Config {
    Config {
        airtable_api_key: "test-airtable-key".into(),
        airtable_base_id: "appTEST".into(),
        sendgrid_api_key: "test-sendgrid-key".into(),
        sendgrid_from_email: "hello@example.com".into(),
        sendgrid_list_id: Some("list-1".into()),
        notification_email: "info@example.com".into(),
        storage: None,
        shippo_webhook_secret: None,
        require_signature: false,
        port: 0,
    }
}

/// An order store over a fixed set of snapshots, recording writes.
#[derive(Default)]
pub struct FakeOrderStore {
    pub orders: Vec<OrderSnapshot>,
    pub status_updates: Mutex<Vec<(RecordId, OrderStatus, Option<TrackingNumber>)>>,
    pub field_updates: Mutex<Vec<(RecordId, String, String)>>,
    /// When set, every call fails (exercises the 500 paths).
    pub fail: bool,
}

impl FakeOrderStore {
    pub fn with_orders(orders: Vec<OrderSnapshot>) -> Self {
        FakeOrderStore {
            orders,
            ..Default::default()
        }
    }

    fn error() -> AirtableError {
        AirtableError::Api {
            status: 503,
            body: "fake outage".into(),
        }
    }
}

#[async_trait]
impl OrderStore for FakeOrderStore {
    async fn find_order_by_tracking(
        &self,
        tracking: &TrackingNumber,
    ) -> Result<Option<OrderSnapshot>, AirtableError> {
        if self.fail {
            return Err(Self::error());
        }
        Ok(self
            .orders
            .iter()
            .find(|order| order.slot_for(tracking).is_some())
            .cloned())
    }

    async fn update_order_status(
        &self,
        record_id: &RecordId,
        status: OrderStatus,
        tracking: Option<&TrackingNumber>,
    ) -> Result<(), AirtableError> {
        if self.fail {
            return Err(Self::error());
        }
        self.status_updates.lock().unwrap().push((
            record_id.clone(),
            status,
            tracking.cloned(),
        ));
        Ok(())
    }

    async fn set_order_field(
        &self,
        record_id: &RecordId,
        field: &str,
        value: &str,
    ) -> Result<(), AirtableError> {
        if self.fail {
            return Err(Self::error());
        }
        self.field_updates.lock().unwrap().push((
            record_id.clone(),
            field.to_string(),
            value.to_string(),
        ));
        Ok(())
    }
}

/// A mailer that records everything it is asked to send.
#[derive(Default)]
pub struct FakeMailer {
    pub sent: Mutex<Vec<OutboundEmail>>,
    pub contacts: Mutex<Vec<(MarketingContact, String)>>,
    pub fail: bool,
}

#[async_trait]
impl Mailer for FakeMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<(), SendGridError> {
        if self.fail {
            return Err(SendGridError::Api {
                status: 503,
                body: "fake outage".into(),
            });
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }

    async fn upsert_marketing_contact(
        &self,
        contact: &MarketingContact,
        list_id: &str,
    ) -> Result<(), SendGridError> {
        if self.fail {
            return Err(SendGridError::Api {
                status: 503,
                body: "fake outage".into(),
            });
        }
        self.contacts
            .lock()
            .unwrap()
            .push((contact.clone(), list_id.to_string()));
        Ok(())
    }
}

/// A file store that records folders and hands back a canned link.
#[derive(Default)]
pub struct FakeFileStore {
    pub folders: Mutex<Vec<String>>,
    pub links: Mutex<Vec<String>>,
    pub fail: bool,
}

#[async_trait]
impl FileStore for FakeFileStore {
    async fn create_folder(&self, path: &str) -> Result<(), DropboxError> {
        if self.fail {
            return Err(DropboxError::Api {
                status: 503,
                summary: "fake outage".into(),
            });
        }
        self.folders.lock().unwrap().push(path.to_string());
        Ok(())
    }

    async fn create_shared_link(&self, path: &str) -> Result<String, DropboxError> {
        if self.fail {
            return Err(DropboxError::Api {
                status: 503,
                summary: "fake outage".into(),
            });
        }
        self.links.lock().unwrap().push(path.to_string());
        Ok(format!("https://www.dropbox.com/sh/fake{}", path.len()))
    }
}

/// Builds an [`AppState`] over the given fakes.
pub fn test_state(
    config: Config,
    orders: Arc<FakeOrderStore>,
    mailer: Arc<FakeMailer>,
    files: Option<Arc<FakeFileStore>>,
) -> AppState {
    AppState::new(
        config,
        orders,
        mailer,
        files.map(|f| f as Arc<dyn FileStore>),
    )
}

/// A pending order with all three slots populated, for tracking tests.
pub fn sample_order(status: OrderStatus) -> OrderSnapshot {
    OrderSnapshot {
        record_id: RecordId::new("recORDER1"),
        order_number: Some(crate::types::OrderNumber::new("HB-1001")),
        current_status: status,
        outbound_tracking: Some(TrackingNumber::from("TRK1")),
        inbound_tracking: Some(TrackingNumber::from("TRK2")),
        return_tracking: Some(TrackingNumber::from("TRK3")),
    }
}

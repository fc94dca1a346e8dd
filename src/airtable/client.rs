//! REST client for the tabular database (Airtable).
//!
//! All order state lives in the `Orders` table of one base. The client is
//! scoped to that base at construction; handlers never see URLs or field
//! names, only [`OrderSnapshot`] values and typed updates.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use super::error::AirtableError;
use super::OrderStore;
use crate::types::{OrderNumber, OrderSnapshot, OrderStatus, RecordId, TrackingNumber};

const DEFAULT_BASE_URL: &str = "https://api.airtable.com/v0";

/// Field names in the `Orders` table.
const FIELD_OPS_STATUS: &str = "Ops Status";
const FIELD_ACTIVE_TRACKING: &str = "Active Tracking Number";
const FIELD_ORDER_NUMBER: &str = "Order Number";
const FIELD_LABEL_1: &str = "Label 1 Tracking";
const FIELD_LABEL_2: &str = "Label 2 Tracking";
const FIELD_LABEL_3: &str = "Label 3 Tracking";

/// A REST client scoped to one base.
#[derive(Clone)]
pub struct AirtableClient {
    http: reqwest::Client,
    base_url: String,
    base_id: String,
    api_key: String,
}

impl AirtableClient {
    /// Creates a client for the given base.
    pub fn new(api_key: impl Into<String>, base_id: impl Into<String>) -> Self {
        Self::with_base_url(api_key, base_id, DEFAULT_BASE_URL)
    }

    /// Creates a client pointed at a non-default endpoint (tests).
    pub fn with_base_url(
        api_key: impl Into<String>,
        base_id: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            base_id: base_id.into(),
            api_key: api_key.into(),
        }
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}/{}", self.base_url, self.base_id, endpoint)
    }

    fn auth_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", self.api_key)) {
            headers.insert(AUTHORIZATION, value);
        }
        headers
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, AirtableError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(AirtableError::Api {
            status: status.as_u16(),
            body,
        })
    }
}

impl std::fmt::Debug for AirtableClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AirtableClient")
            .field("base_id", &self.base_id)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    records: Vec<RawOrderRecord>,
}

#[derive(Debug, Deserialize)]
struct RawOrderRecord {
    id: String,
    #[serde(default)]
    fields: serde_json::Map<String, Value>,
}

impl RawOrderRecord {
    fn field_str(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    fn tracking(&self, name: &str) -> Option<TrackingNumber> {
        self.field_str(name).map(TrackingNumber::from)
    }

    fn into_snapshot(self) -> Result<OrderSnapshot, AirtableError> {
        let raw_status = self.field_str(FIELD_OPS_STATUS).unwrap_or_default();
        let current_status =
            OrderStatus::parse(raw_status).ok_or_else(|| AirtableError::UnrecognizedStatus {
                record_id: self.id.clone(),
                status: raw_status.to_string(),
            })?;

        Ok(OrderSnapshot {
            current_status,
            order_number: self.field_str(FIELD_ORDER_NUMBER).map(OrderNumber::new),
            outbound_tracking: self.tracking(FIELD_LABEL_1),
            inbound_tracking: self.tracking(FIELD_LABEL_2),
            return_tracking: self.tracking(FIELD_LABEL_3),
            record_id: RecordId::new(self.id),
        })
    }
}

/// Builds the `filterByFormula` expression matching a tracking number in
/// any of the three slots. Single quotes in the value are escaped; the
/// formula language uses backslash escapes inside string literals.
fn tracking_filter_formula(tracking: &TrackingNumber) -> String {
    let escaped = tracking.as_str().replace('\\', "\\\\").replace('\'', "\\'");
    format!(
        "OR({{{l1}}}='{v}',{{{l2}}}='{v}',{{{l3}}}='{v}')",
        l1 = FIELD_LABEL_1,
        l2 = FIELD_LABEL_2,
        l3 = FIELD_LABEL_3,
        v = escaped,
    )
}

#[async_trait]
impl OrderStore for AirtableClient {
    async fn find_order_by_tracking(
        &self,
        tracking: &TrackingNumber,
    ) -> Result<Option<OrderSnapshot>, AirtableError> {
        let response = self
            .http
            .get(self.url("Orders"))
            .headers(self.auth_headers())
            .query(&[("filterByFormula", tracking_filter_formula(tracking))])
            .send()
            .await?;

        let list: ListResponse = Self::check(response).await?.json().await?;
        debug!(tracking = %tracking, matches = list.records.len(), "order lookup");

        // Multiple matches are not disambiguated; first record wins.
        match list.records.into_iter().next() {
            Some(record) => record.into_snapshot().map(Some),
            None => Ok(None),
        }
    }

    async fn update_order_status(
        &self,
        record_id: &RecordId,
        status: OrderStatus,
        tracking: Option<&TrackingNumber>,
    ) -> Result<(), AirtableError> {
        let mut fields = json!({ FIELD_OPS_STATUS: status.name() });
        if let Some(tracking) = tracking {
            fields[FIELD_ACTIVE_TRACKING] = json!(tracking.as_str());
        }

        let response = self
            .http
            .patch(self.url(&format!("Orders/{}", record_id)))
            .headers(self.auth_headers())
            .json(&json!({ "fields": fields }))
            .send()
            .await?;

        Self::check(response).await?;
        debug!(record_id = %record_id, status = %status, "order status updated");
        Ok(())
    }

    async fn set_order_field(
        &self,
        record_id: &RecordId,
        field: &str,
        value: &str,
    ) -> Result<(), AirtableError> {
        let response = self
            .http
            .patch(self.url(&format!("Orders/{}", record_id)))
            .headers(self.auth_headers())
            .json(&json!({ "fields": { field: value } }))
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> AirtableClient {
        AirtableClient::with_base_url("test-key", "appBASE", server.uri())
    }

    #[test]
    fn filter_formula_covers_all_three_slots() {
        let formula = tracking_filter_formula(&TrackingNumber::from("TRK1"));
        assert_eq!(
            formula,
            "OR({Label 1 Tracking}='TRK1',{Label 2 Tracking}='TRK1',{Label 3 Tracking}='TRK1')"
        );
    }

    #[test]
    fn filter_formula_escapes_quotes() {
        let formula = tracking_filter_formula(&TrackingNumber::from("a'b"));
        assert!(formula.contains("='a\\'b'"));
    }

    #[tokio::test]
    async fn find_order_parses_snapshot() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/appBASE/Orders"))
            .and(header("authorization", "Bearer test-key"))
            .and(query_param(
                "filterByFormula",
                "OR({Label 1 Tracking}='TRK2',{Label 2 Tracking}='TRK2',{Label 3 Tracking}='TRK2')",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "records": [{
                    "id": "recABC",
                    "fields": {
                        "Ops Status": "Kit Sent",
                        "Order Number": "HB-1001",
                        "Label 1 Tracking": "TRK1",
                        "Label 2 Tracking": "TRK2"
                    }
                }]
            })))
            .mount(&server)
            .await;

        let order = client(&server)
            .find_order_by_tracking(&TrackingNumber::from("TRK2"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(order.record_id.as_str(), "recABC");
        assert_eq!(order.current_status, OrderStatus::KitSent);
        assert_eq!(order.order_number, Some(OrderNumber::new("HB-1001")));
        assert_eq!(order.inbound_tracking, Some(TrackingNumber::from("TRK2")));
        assert_eq!(order.return_tracking, None);
    }

    #[tokio::test]
    async fn find_order_returns_none_for_no_match() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/appBASE/Orders"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "records": [] })),
            )
            .mount(&server)
            .await;

        let result = client(&server)
            .find_order_by_tracking(&TrackingNumber::from("NOPE"))
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn find_order_first_match_wins() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/appBASE/Orders"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "records": [
                    { "id": "recFIRST", "fields": { "Ops Status": "Pending" } },
                    { "id": "recSECOND", "fields": { "Ops Status": "Complete" } }
                ]
            })))
            .mount(&server)
            .await;

        let order = client(&server)
            .find_order_by_tracking(&TrackingNumber::from("TRK1"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(order.record_id.as_str(), "recFIRST");
    }

    #[tokio::test]
    async fn find_order_rejects_unknown_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/appBASE/Orders"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "records": [
                    { "id": "recBAD", "fields": { "Ops Status": "Lost In Warehouse" } }
                ]
            })))
            .mount(&server)
            .await;

        let err = client(&server)
            .find_order_by_tracking(&TrackingNumber::from("TRK1"))
            .await
            .unwrap_err();
        assert!(matches!(err, AirtableError::UnrecognizedStatus { .. }));
    }

    #[tokio::test]
    async fn update_order_status_patches_both_fields() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/appBASE/Orders/recABC"))
            .and(body_partial_json(serde_json::json!({
                "fields": {
                    "Ops Status": "Media Received",
                    "Active Tracking Number": "TRK2"
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&server)
            .await;

        client(&server)
            .update_order_status(
                &RecordId::new("recABC"),
                OrderStatus::MediaReceived,
                Some(&TrackingNumber::from("TRK2")),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn update_order_status_without_tracking_omits_the_field() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/appBASE/Orders/recABC"))
            .and(body_partial_json(serde_json::json!({
                "fields": { "Ops Status": "Kit Sent" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        client(&server)
            .update_order_status(&RecordId::new("recABC"), OrderStatus::KitSent, None)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn api_errors_surface_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/appBASE/Orders/recABC"))
            .respond_with(ResponseTemplate::new(422).set_body_string("unknown field"))
            .mount(&server)
            .await;

        let err = client(&server)
            .set_order_field(&RecordId::new("recABC"), "Dropbox Link", "https://x")
            .await
            .unwrap_err();
        match err {
            AirtableError::Api { status, body } => {
                assert_eq!(status, 422);
                assert_eq!(body, "unknown field");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}

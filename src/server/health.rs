//! Liveness probe and service descriptor endpoints.

use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

/// Health check handler.
///
/// Returns 200 OK with the text "OK"; intended for load balancers and
/// uptime monitors.
pub async fn health_handler() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK")
}

/// Root handler: describes the service and its endpoints.
pub async fn root_handler() -> Json<Value> {
    Json(json!({
        "name": "fulfillment-relay",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
        "endpoints": {
            "health": "GET /health",
            "webhooks": [
                "POST /webhook/new-prospect",
                "POST /webhook/order-status-changed",
                "POST /webhook/create-dropbox-folder",
                "POST /webhook/shippo-tracking",
            ],
        },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

//! Deliverable-folder endpoint.
//!
//! Provisions the customer's Dropbox folder, creates (or retrieves) its
//! public shared link, and writes the link back onto the order record. The
//! write-back is best-effort: the folder and link already exist at that
//! point, so a database outage is logged and the caller still gets them.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use super::AppState;
use crate::dropbox::DropboxError;
use crate::webhooks::{parse_record_payload, ParseError};

const CLIENT_FILES_ROOT: &str = "/HeritageboxClientFiles";
const DROPBOX_LINK_FIELD: &str = "Dropbox Link";

#[derive(Debug, Error)]
pub enum StorageFolderError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("storage credentials not configured")]
    NotConfigured,

    #[error(transparent)]
    Storage(#[from] DropboxError),
}

impl IntoResponse for StorageFolderError {
    fn into_response(self) -> Response {
        let status = match &self {
            StorageFolderError::Parse(_) => StatusCode::BAD_REQUEST,
            StorageFolderError::NotConfigured | StorageFolderError::Storage(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageFolderResponse {
    pub success: bool,
    pub folder_path: String,
    pub dropbox_link: String,
}

/// Deliverable-folder handler.
pub async fn storage_folder_handler(
    State(app_state): State<AppState>,
    body: Bytes,
) -> Result<Json<StorageFolderResponse>, StorageFolderError> {
    let record = parse_record_payload(&body)?;
    let customer_name = record.require_str("Customer Name")?;
    let order_number = record
        .field_display("Order Number")
        .unwrap_or_else(|| "Unknown".to_string());

    let Some(files) = app_state.files() else {
        warn!("storage credentials not configured");
        return Err(StorageFolderError::NotConfigured);
    };

    let folder_path = format!("{CLIENT_FILES_ROOT}/{customer_name} - {order_number}");
    info!(path = %folder_path, "creating deliverable folder");

    files.create_folder(&folder_path).await?;
    let dropbox_link = files.create_shared_link(&folder_path).await?;

    // Best-effort: the folder exists regardless of whether the link lands
    // on the record.
    if let Err(error) = app_state
        .orders()
        .set_order_field(&record.id, DROPBOX_LINK_FIELD, &dropbox_link)
        .await
    {
        warn!(record = %record.id, %error, "could not store folder link on order");
    }

    info!(path = %folder_path, link = %dropbox_link, "deliverable folder ready");
    Ok(Json(StorageFolderResponse {
        success: true,
        folder_path,
        dropbox_link,
    }))
}

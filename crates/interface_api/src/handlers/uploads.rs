//! Upload and download handlers

use axum::{extract::State, Json};

use domain_receipts::UploadTarget;

use crate::dto::receipts::{DownloadResponse, StorageReferenceRequest};
use crate::{error::ApiError, AppState};

/// Mints an upload URL and the reference the uploaded blob will have
pub async fn issue_upload_target(State(state): State<AppState>) -> Result<Json<UploadTarget>, ApiError> {
    Ok(Json(state.uploads.issue_upload_target().await?))
}

/// Resolves a storage reference to a download URL
pub async fn issue_download_url(
    State(state): State<AppState>,
    Json(request): Json<StorageReferenceRequest>,
) -> Result<Json<DownloadResponse>, ApiError> {
    let url = state.uploads.issue_download_url(&request.storage_reference).await?;
    Ok(Json(DownloadResponse { url }))
}

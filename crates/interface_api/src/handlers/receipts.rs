//! Receipt handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use core_kernel::ReceiptId;

use crate::dto::loads::LoadResponse;
use crate::dto::receipts::*;
use crate::{error::ApiError, AppState};

/// Lists load-attached receipts followed by standalone ones
pub async fn list_receipts(State(state): State<AppState>) -> Result<Json<Vec<ReceiptEntry>>, ApiError> {
    let receipts = state.registry.list_all().await?;
    Ok(Json(receipts.into_iter().map(ReceiptEntry::from).collect()))
}

/// Loads with a receipt created at or after `since`
pub async fn new_load_receipts(
    State(state): State<AppState>,
    Query(params): Query<NewReceiptsParams>,
) -> Result<Json<Vec<LoadResponse>>, ApiError> {
    let loads = state.loads.new_receipts_since(params.since).await?;
    Ok(Json(loads.into_iter().map(LoadResponse::from).collect()))
}

/// Saves a receipt that has no load yet
pub async fn save_standalone_receipt(
    State(state): State<AppState>,
    Json(request): Json<StorageReferenceRequest>,
) -> Result<(StatusCode, Json<SaveReceiptResponse>), ApiError> {
    let receipt = state.registry.save_standalone(&request.storage_reference).await?;
    Ok((
        StatusCode::CREATED,
        Json(SaveReceiptResponse {
            success: true,
            storage_reference: receipt.storage_reference,
            receipt_id: receipt.id,
        }),
    ))
}

/// Removes a reference from the blob store, every load and the ledger
pub async fn delete_by_reference(
    State(state): State<AppState>,
    Path(reference): Path<String>,
) -> Result<Json<DeleteReceiptResponse>, ApiError> {
    let report = state.lifecycle.delete_by_reference(&reference).await?;
    Ok(Json(report.into()))
}

pub async fn delete_standalone_receipt(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteReceiptResponse>, ApiError> {
    let report = state.lifecycle.delete_standalone_receipt(ReceiptId::from(id)).await?;
    Ok(Json(report.into()))
}

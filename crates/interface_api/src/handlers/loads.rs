//! Load handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use core_kernel::LoadId;

use crate::dto::loads::*;
use crate::{error::ApiError, AppState};

/// Creates a load
pub async fn create_load(
    State(state): State<AppState>,
    Json(request): Json<LoadRequest>,
) -> Result<(StatusCode, Json<LoadResponse>), ApiError> {
    let load = state.loads.create_load(request.into()).await?;
    Ok((StatusCode::CREATED, Json(load.into())))
}

/// Lists loads by optional `dateFrom`/`dateTo` and `location`
pub async fn list_loads(
    State(state): State<AppState>,
    Query(params): Query<ListLoadsParams>,
) -> Result<Json<Vec<LoadResponse>>, ApiError> {
    let loads = state.loads.list_loads(params.into()).await?;
    Ok(Json(loads.into_iter().map(LoadResponse::from).collect()))
}

/// Lists loads created today in the business timezone
pub async fn list_today(State(state): State<AppState>) -> Result<Json<Vec<LoadResponse>>, ApiError> {
    let loads = state.loads.list_today().await?;
    Ok(Json(loads.into_iter().map(LoadResponse::from).collect()))
}

pub async fn get_load(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<LoadResponse>, ApiError> {
    let load = state.loads.get_load(LoadId::from(id)).await?;
    Ok(Json(load.into()))
}

/// Replaces a load's descriptive fields
pub async fn update_load(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<LoadRequest>,
) -> Result<Json<LoadResponse>, ApiError> {
    let load = state.loads.update_load(LoadId::from(id), request.into()).await?;
    Ok(Json(load.into()))
}

/// Deletes a load, cascading to its receipt blob
pub async fn delete_load(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteLoadResponse>, ApiError> {
    let report = state.lifecycle.cascade_delete_for_load(LoadId::from(id)).await?;
    Ok(Json(report.into()))
}

/// Attaches a receipt to a load
pub async fn attach_receipt(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AttachReceiptRequest>,
) -> Result<Json<LoadResponse>, ApiError> {
    let load = state
        .lifecycle
        .attach(LoadId::from(id), &request.storage_reference)
        .await?;
    Ok(Json(load.into()))
}

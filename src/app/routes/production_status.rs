use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use axum_extra::extract::WithRejection;

use crate::api::error::ApiError;
use crate::api::production_status_api::{
    AddStationRequest, CreateProductionStatusRequest, RecordQualityRequest,
    UpdateProductionStatusRequest,
};

use super::common::{blocking, ApiJson, ApiPath, SharedState};

// ==========================================
// 车辆生产状态路由
// ==========================================

pub(super) fn router() -> Router<SharedState> {
    Router::new()
        .route("/production-status", get(list).post(create))
        .route(
            "/production-status/{id}",
            get(get_one).patch(update).delete(remove),
        )
        .route("/production-status/{id}/station", post(add_station))
        .route(
            "/production-status/{id}/quality",
            patch(record_quality).delete(clear_quality),
        )
}

async fn list(State(state): State<SharedState>) -> Result<impl IntoResponse, ApiError> {
    let api = state.production_status_api.clone();
    let items = blocking(move || api.list()).await?;
    Ok(Json(items))
}

async fn get_one(
    State(state): State<SharedState>,
    WithRejection(Path(id), _): ApiPath<String>,
) -> Result<impl IntoResponse, ApiError> {
    let api = state.production_status_api.clone();
    let item = blocking(move || api.get(&id)).await?;
    Ok(Json(item))
}

async fn create(
    State(state): State<SharedState>,
    WithRejection(Json(req), _): ApiJson<CreateProductionStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let api = state.production_status_api.clone();
    let item = blocking(move || api.create(req)).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

async fn update(
    State(state): State<SharedState>,
    WithRejection(Path(id), _): ApiPath<String>,
    WithRejection(Json(req), _): ApiJson<UpdateProductionStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let api = state.production_status_api.clone();
    let item = blocking(move || api.update(&id, req)).await?;
    Ok(Json(item))
}

async fn remove(
    State(state): State<SharedState>,
    WithRejection(Path(id), _): ApiPath<String>,
) -> Result<impl IntoResponse, ApiError> {
    let api = state.production_status_api.clone();
    blocking(move || api.remove(&id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn add_station(
    State(state): State<SharedState>,
    WithRejection(Path(id), _): ApiPath<String>,
    WithRejection(Json(req), _): ApiJson<AddStationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let api = state.production_status_api.clone();
    let item = blocking(move || api.add_station(&id, req)).await?;
    Ok(Json(item))
}

async fn record_quality(
    State(state): State<SharedState>,
    WithRejection(Path(id), _): ApiPath<String>,
    WithRejection(Json(req), _): ApiJson<RecordQualityRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let api = state.production_status_api.clone();
    let item = blocking(move || api.record_quality(&id, req)).await?;
    Ok(Json(item))
}

async fn clear_quality(
    State(state): State<SharedState>,
    WithRejection(Path(id), _): ApiPath<String>,
) -> Result<impl IntoResponse, ApiError> {
    let api = state.production_status_api.clone();
    let item = blocking(move || api.clear_quality(&id)).await?;
    Ok(Json(item))
}

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_extra::extract::WithRejection;

use crate::api::error::ApiError;
use crate::api::station_daily_api::{
    CreateDowntimeLogRequest, CreateStationDailyStatusRequest, UpdateDowntimeLogRequest,
    UpdateStationDailyStatusRequest,
};

use super::common::{blocking, ApiJson, ApiPath, SharedState};

// ==========================================
// 工位日状态 / 停机记录路由
// ==========================================

pub(super) fn router() -> Router<SharedState> {
    Router::new()
        .route(
            "/station-daily-status",
            get(list_daily_status).post(create_daily_status),
        )
        .route(
            "/station-daily-status/{id}",
            get(get_daily_status)
                .patch(update_daily_status)
                .delete(delete_daily_status),
        )
        .route(
            "/station-daily-status/station/{station_id}",
            get(list_daily_status_by_station),
        )
        .route(
            "/station-downtime-log",
            get(list_downtime_logs).post(create_downtime_log),
        )
        .route(
            "/station-downtime-log/{id}",
            get(get_downtime_log)
                .patch(update_downtime_log)
                .delete(delete_downtime_log),
        )
        .route(
            "/station-downtime-log/station-daily/{station_daily_id}",
            get(list_downtime_logs_by_daily),
        )
}

// ===== 工位日状态 =====

async fn list_daily_status(State(state): State<SharedState>) -> Result<impl IntoResponse, ApiError> {
    let api = state.station_daily_api.clone();
    let items = blocking(move || api.list_daily_status()).await?;
    Ok(Json(items))
}

async fn get_daily_status(
    State(state): State<SharedState>,
    WithRejection(Path(id), _): ApiPath<String>,
) -> Result<impl IntoResponse, ApiError> {
    let api = state.station_daily_api.clone();
    let item = blocking(move || api.get_daily_status(&id)).await?;
    Ok(Json(item))
}

async fn list_daily_status_by_station(
    State(state): State<SharedState>,
    WithRejection(Path(station_id), _): ApiPath<String>,
) -> Result<impl IntoResponse, ApiError> {
    let api = state.station_daily_api.clone();
    let items = blocking(move || api.list_daily_status_by_station(&station_id)).await?;
    Ok(Json(items))
}

async fn create_daily_status(
    State(state): State<SharedState>,
    WithRejection(Json(req), _): ApiJson<CreateStationDailyStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let api = state.station_daily_api.clone();
    let item = blocking(move || api.create_daily_status(req)).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

async fn update_daily_status(
    State(state): State<SharedState>,
    WithRejection(Path(id), _): ApiPath<String>,
    WithRejection(Json(req), _): ApiJson<UpdateStationDailyStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let api = state.station_daily_api.clone();
    let item = blocking(move || api.update_daily_status(&id, req)).await?;
    Ok(Json(item))
}

async fn delete_daily_status(
    State(state): State<SharedState>,
    WithRejection(Path(id), _): ApiPath<String>,
) -> Result<impl IntoResponse, ApiError> {
    let api = state.station_daily_api.clone();
    blocking(move || api.delete_daily_status(&id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ===== 停机记录 =====

async fn list_downtime_logs(State(state): State<SharedState>) -> Result<impl IntoResponse, ApiError> {
    let api = state.station_daily_api.clone();
    let items = blocking(move || api.list_downtime_logs()).await?;
    Ok(Json(items))
}

async fn get_downtime_log(
    State(state): State<SharedState>,
    WithRejection(Path(id), _): ApiPath<String>,
) -> Result<impl IntoResponse, ApiError> {
    let api = state.station_daily_api.clone();
    let item = blocking(move || api.get_downtime_log(&id)).await?;
    Ok(Json(item))
}

async fn list_downtime_logs_by_daily(
    State(state): State<SharedState>,
    WithRejection(Path(station_daily_id), _): ApiPath<String>,
) -> Result<impl IntoResponse, ApiError> {
    let api = state.station_daily_api.clone();
    let items = blocking(move || api.list_downtime_logs_by_daily(&station_daily_id)).await?;
    Ok(Json(items))
}

async fn create_downtime_log(
    State(state): State<SharedState>,
    WithRejection(Json(req), _): ApiJson<CreateDowntimeLogRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let api = state.station_daily_api.clone();
    let item = blocking(move || api.create_downtime_log(req)).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

async fn update_downtime_log(
    State(state): State<SharedState>,
    WithRejection(Path(id), _): ApiPath<String>,
    WithRejection(Json(req), _): ApiJson<UpdateDowntimeLogRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let api = state.station_daily_api.clone();
    let item = blocking(move || api.update_downtime_log(&id, req)).await?;
    Ok(Json(item))
}

async fn delete_downtime_log(
    State(state): State<SharedState>,
    WithRejection(Path(id), _): ApiPath<String>,
) -> Result<impl IntoResponse, ApiError> {
    let api = state.station_daily_api.clone();
    blocking(move || api.delete_downtime_log(&id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

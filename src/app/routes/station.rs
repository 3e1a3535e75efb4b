use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, patch};
use axum::{Json, Router};
use axum_extra::extract::WithRejection;

use crate::api::error::ApiError;
use crate::api::station_api::{
    CreateStationRequest, UpdateStationRequest, UpdateStationStatusRequest,
};

use super::common::{blocking, ApiJson, ApiPath, SharedState};

// ==========================================
// 工位路由（/stations 与 /station 等价）
// ==========================================

pub(super) fn router() -> Router<SharedState> {
    let mut router = Router::new();
    for base in ["/stations", "/station"] {
        router = router
            .route(base, get(list_stations).post(create_station))
            .route(&format!("{}/active", base), get(list_active_stations))
            .route(
                &format!("{}/{{id}}", base),
                get(get_station).patch(update_station).delete(delete_station),
            )
            .route(&format!("{}/{{id}}/status", base), patch(update_station_status));
    }
    router
}

async fn list_stations(State(state): State<SharedState>) -> Result<impl IntoResponse, ApiError> {
    let api = state.station_api.clone();
    let stations = blocking(move || api.list_stations()).await?;
    Ok(Json(stations))
}

async fn list_active_stations(
    State(state): State<SharedState>,
) -> Result<impl IntoResponse, ApiError> {
    let api = state.station_api.clone();
    let stations = blocking(move || api.list_active_stations()).await?;
    Ok(Json(stations))
}

async fn get_station(
    State(state): State<SharedState>,
    WithRejection(Path(id), _): ApiPath<String>,
) -> Result<impl IntoResponse, ApiError> {
    let api = state.station_api.clone();
    let station = blocking(move || api.get_station(&id)).await?;
    Ok(Json(station))
}

async fn create_station(
    State(state): State<SharedState>,
    WithRejection(Json(req), _): ApiJson<CreateStationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let api = state.station_api.clone();
    let station = blocking(move || api.create_station(req)).await?;
    Ok((StatusCode::CREATED, Json(station)))
}

async fn update_station(
    State(state): State<SharedState>,
    WithRejection(Path(id), _): ApiPath<String>,
    WithRejection(Json(req), _): ApiJson<UpdateStationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let api = state.station_api.clone();
    let station = blocking(move || api.update_station(&id, req)).await?;
    Ok(Json(station))
}

async fn update_station_status(
    State(state): State<SharedState>,
    WithRejection(Path(id), _): ApiPath<String>,
    WithRejection(Json(req), _): ApiJson<UpdateStationStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let api = state.station_api.clone();
    let station = blocking(move || api.update_status(&id, req)).await?;
    Ok(Json(station))
}

async fn delete_station(
    State(state): State<SharedState>,
    WithRejection(Path(id), _): ApiPath<String>,
) -> Result<impl IntoResponse, ApiError> {
    let api = state.station_api.clone();
    blocking(move || api.delete_station(&id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

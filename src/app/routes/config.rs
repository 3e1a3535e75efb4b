use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::{get, put};
use axum::{Json, Router};
use axum_extra::extract::WithRejection;
use serde::Serialize;

use crate::api::config_api::UpdateConfigRequest;
use crate::api::error::ApiError;

use super::common::{blocking, ApiJson, ApiPath, SharedState};

// ==========================================
// 配置管理 / 健康检查路由
// ==========================================

pub(super) fn router() -> Router<SharedState> {
    Router::new()
        .route("/config", get(list_configs))
        .route("/config/{key}", put(update_config))
        .route("/health", get(health_check))
}

async fn list_configs(State(state): State<SharedState>) -> Result<impl IntoResponse, ApiError> {
    let api = state.config_api.clone();
    let items = blocking(move || api.list_configs()).await?;
    Ok(Json(items))
}

async fn update_config(
    State(state): State<SharedState>,
    WithRejection(Path(key), _): ApiPath<String>,
    WithRejection(Json(req), _): ApiJson<UpdateConfigRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let api = state.config_api.clone();
    let item = blocking(move || api.update_config(&key, req)).await?;
    Ok(Json(item))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: crate::VERSION,
    })
}

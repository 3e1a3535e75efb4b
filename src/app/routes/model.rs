use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_extra::extract::WithRejection;

use crate::api::error::ApiError;
use crate::api::model_api::{CreateModelRequest, UpdateModelRequest};

use super::common::{blocking, ApiJson, ApiPath, SharedState};

// ==========================================
// 车型路由
// ==========================================

pub(super) fn router() -> Router<SharedState> {
    Router::new()
        .route("/models", get(list_models).post(create_model))
        .route(
            "/models/{model_id}",
            get(get_model).put(update_model).delete(delete_model),
        )
}

async fn list_models(State(state): State<SharedState>) -> Result<impl IntoResponse, ApiError> {
    let api = state.model_api.clone();
    let models = blocking(move || api.list_models()).await?;
    Ok(Json(models))
}

async fn get_model(
    State(state): State<SharedState>,
    WithRejection(Path(model_id), _): ApiPath<String>,
) -> Result<impl IntoResponse, ApiError> {
    let api = state.model_api.clone();
    let model = blocking(move || api.get_model(&model_id)).await?;
    Ok(Json(model))
}

async fn create_model(
    State(state): State<SharedState>,
    WithRejection(Json(req), _): ApiJson<CreateModelRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let api = state.model_api.clone();
    let model = blocking(move || api.create_model(req)).await?;
    Ok((StatusCode::CREATED, Json(model)))
}

async fn update_model(
    State(state): State<SharedState>,
    WithRejection(Path(model_id), _): ApiPath<String>,
    WithRejection(Json(req), _): ApiJson<UpdateModelRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let api = state.model_api.clone();
    let model = blocking(move || api.update_model(&model_id, req)).await?;
    Ok(Json(model))
}

async fn delete_model(
    State(state): State<SharedState>,
    WithRejection(Path(model_id), _): ApiPath<String>,
) -> Result<impl IntoResponse, ApiError> {
    let api = state.model_api.clone();
    blocking(move || api.delete_model(&model_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use axum_extra::extract::WithRejection;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::plan_api::{UpsertDailyPlanRequest, UpsertMonthPlanRequest};

use super::common::{blocking, ApiJson, ApiPath, ApiQuery, SharedState};

// ==========================================
// 生产计划路由
// ==========================================

pub(super) fn router() -> Router<SharedState> {
    Router::new()
        .route("/production-plan/month", post(upsert_month_plan))
        .route("/production-plan/day", post(upsert_daily_plan))
        .route("/production-plan/month-all", get(list_month_plans))
        .route("/production-plan/day-all", get(list_daily_plans))
        .route("/production-plan/summary", get(daily_summary))
        .route("/production-plan/month/{id}", delete(delete_month_plan))
        .route("/production-plan/day/{id}", delete(delete_daily_plan))
}

#[derive(Debug, Deserialize)]
struct MonthQuery {
    month: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DateQuery {
    date: Option<String>,
}

fn required(param: &str, value: Option<String>) -> Result<String, ApiError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ApiError::InvalidInput(format!("缺少查询参数{}", param)))
}

async fn upsert_month_plan(
    State(state): State<SharedState>,
    WithRejection(Json(req), _): ApiJson<UpsertMonthPlanRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let api = state.plan_api.clone();
    let plan = blocking(move || api.upsert_month_plan(req)).await?;
    Ok((StatusCode::CREATED, Json(plan)))
}

async fn upsert_daily_plan(
    State(state): State<SharedState>,
    WithRejection(Json(req), _): ApiJson<UpsertDailyPlanRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let api = state.plan_api.clone();
    let plan = blocking(move || api.upsert_daily_plan(req)).await?;
    Ok((StatusCode::CREATED, Json(plan)))
}

async fn list_month_plans(
    State(state): State<SharedState>,
    WithRejection(Query(query), _): ApiQuery<MonthQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let month = required("month", query.month)?;
    let api = state.plan_api.clone();
    let plans = blocking(move || api.list_month_plans(&month)).await?;
    Ok(Json(plans))
}

async fn list_daily_plans(
    State(state): State<SharedState>,
    WithRejection(Query(query), _): ApiQuery<DateQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let date = required("date", query.date)?;
    let api = state.plan_api.clone();
    let plans = blocking(move || api.list_daily_plans(&date)).await?;
    Ok(Json(plans))
}

async fn daily_summary(
    State(state): State<SharedState>,
    WithRejection(Query(query), _): ApiQuery<DateQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let date = required("date", query.date)?;
    let api = state.plan_api.clone();
    let summary = blocking(move || api.daily_summary(&date)).await?;
    Ok(Json(summary))
}

async fn delete_month_plan(
    State(state): State<SharedState>,
    WithRejection(Path(id), _): ApiPath<String>,
) -> Result<impl IntoResponse, ApiError> {
    let api = state.plan_api.clone();
    blocking(move || api.delete_month_plan(&id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_daily_plan(
    State(state): State<SharedState>,
    WithRejection(Path(id), _): ApiPath<String>,
) -> Result<impl IntoResponse, ApiError> {
    let api = state.plan_api.clone();
    blocking(move || api.delete_daily_plan(&id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ==========================================
// 整车产线生产跟踪系统 - HTTP 路由（按域拆分）
// ==========================================
// 职责: 路由定义,连接看板与后端 API
// ==========================================

mod common;
mod config;
mod model;
mod plan;
mod production_status;
mod station;
mod station_daily;

use axum::Router;
use std::sync::Arc;

use crate::app::state::AppState;

pub use common::ErrorResponse;

/// 组装全部业务路由
pub fn api_router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(model::router())
        .merge(station::router())
        .merge(plan::router())
        .merge(production_status::router())
        .merge(station_daily::router())
        .merge(config::router())
        .with_state(state)
}

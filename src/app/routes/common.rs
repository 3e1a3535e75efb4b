use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::app::state::AppState;

// ==========================================
// 公共工具：共享状态、错误映射、阻塞调用
// ==========================================

pub(super) type SharedState = Arc<AppState>;

// 提取器拒绝统一转为 400 + {code, message}
pub(super) type ApiJson<T> = WithRejection<Json<T>, ApiError>;
pub(super) type ApiPath<T> = WithRejection<Path<T>, ApiError>;
pub(super) type ApiQuery<T> = WithRejection<Query<T>, ApiError>;

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidInput(format!("请求体格式错误: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::InvalidInput(format!("路径参数错误: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::InvalidInput(format!("查询参数错误: {}", rejection.body_text()))
    }
}

/// 错误响应（返回给看板）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// 错误代码
    pub code: String,

    /// 错误消息
    pub message: String,
}

fn status_of(err: &ApiError) -> StatusCode {
    match err {
        ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        ApiError::Conflict(_) => StatusCode::CONFLICT,
        ApiError::DatabaseError(_)
        | ApiError::DatabaseConnectionError(_)
        | ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_of(&self);
        if status.is_server_error() {
            tracing::error!(code = self.code(), "请求处理失败: {}", self);
        }
        let body = ErrorResponse {
            code: self.code().to_string(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// 在阻塞线程池中执行同步 API 调用（SQLite 为同步 I/O）
pub(super) async fn blocking<F, T>(f: F) -> ApiResult<T>
where
    F: FnOnce() -> ApiResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::InternalError(format!("后台任务失败: {}", e)))?
}

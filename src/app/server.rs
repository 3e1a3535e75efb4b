// ==========================================
// 整车产线生产跟踪系统 - HTTP 服务
// ==========================================

use anyhow::{Context, Result};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::app::routes::api_router;
use crate::app::state::AppState;
use crate::config::AppConfig;

/// 构建完整路由（业务路由 + CORS + 请求追踪）
pub fn build_router(state: Arc<AppState>) -> Router {
    api_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// 启动 HTTP 服务，Ctrl+C 时优雅退出
pub async fn start_server(config: AppConfig) -> Result<()> {
    if let Some(parent) = std::path::Path::new(&config.db_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).context("创建数据库目录失败")?;
        }
    }

    let db_path = config.db_path.clone();
    let state = tokio::task::spawn_blocking(move || AppState::new(db_path))
        .await
        .context("初始化任务异常退出")?
        .map_err(|e| anyhow::anyhow!(e))?;

    let app = build_router(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("无法绑定地址 {}", config.bind_addr))?;

    let local_addr = listener.local_addr()?;
    tracing::info!("{} 已启动: http://{}", crate::APP_NAME, local_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP 服务异常")?;

    tracing::info!("服务已停止");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("无法监听 Ctrl+C 信号: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("收到退出信号，正在关闭...");
}

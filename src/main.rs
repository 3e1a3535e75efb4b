// ==========================================
// 整车产线生产跟踪系统 - HTTP 主入口
// ==========================================
// 配置: LINE_TRACKER_DB_PATH / LINE_TRACKER_BIND / LINE_TRACKER_LOG_JSON / RUST_LOG
// ==========================================

use assembly_line_tracker::app::start_server;
use assembly_line_tracker::config::AppConfig;
use assembly_line_tracker::{logging, APP_NAME, VERSION};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志系统
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", APP_NAME);
    tracing::info!("系统版本: {}", VERSION);
    tracing::info!("==================================================");

    let config = AppConfig::from_env()?;
    tracing::info!("使用数据库: {}", config.db_path);

    start_server(config).await
}

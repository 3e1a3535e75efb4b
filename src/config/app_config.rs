// ==========================================
// 整车产线生产跟踪系统 - 进程级配置
// ==========================================
// 来源: 环境变量（启动时尝试加载 .env）
// - LINE_TRACKER_DB_PATH: 数据库文件路径
// - LINE_TRACKER_BIND:    HTTP 监听地址（默认 127.0.0.1:3000）
// ==========================================

use std::net::SocketAddr;
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "LINE_TRACKER_DB_PATH";
pub const ENV_BIND: &str = "LINE_TRACKER_BIND";
pub const DEFAULT_BIND: &str = "127.0.0.1:3000";

/// 进程级配置
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: String,
    pub bind_addr: SocketAddr,
}

impl AppConfig {
    /// 从环境变量构建配置
    pub fn from_env() -> anyhow::Result<Self> {
        // .env 缺失不算错误
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                tracing::warn!("加载 .env 失败: {}", e);
            }
        }

        let bind_raw = env_non_empty(ENV_BIND).unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind_addr: SocketAddr = bind_raw
            .parse()
            .map_err(|e| anyhow::anyhow!("{} 格式错误 ({}): {}", ENV_BIND, bind_raw, e))?;

        Ok(Self {
            db_path: get_default_db_path(),
            bind_addr,
        })
    }
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// 获取默认数据库路径
///
/// 优先级:
/// 1. 环境变量 LINE_TRACKER_DB_PATH
/// 2. 用户数据目录下的 assembly-line-tracker(-dev)/line_tracker.db
/// 3. 当前目录 ./line_tracker.db
pub fn get_default_db_path() -> String {
    if let Some(path) = env_non_empty(ENV_DB_PATH) {
        return path;
    }

    let mut path = PathBuf::from("./line_tracker.db");

    if let Some(data_dir) = dirs::data_dir() {
        // 开发环境使用独立目录，避免污染生产数据
        #[cfg(debug_assertions)]
        let dir = data_dir.join("assembly-line-tracker-dev");

        #[cfg(not(debug_assertions))]
        let dir = data_dir.join("assembly-line-tracker");

        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("line_tracker.db");
        }
    }

    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_default_db_path() {
        let path = get_default_db_path();
        assert!(!path.is_empty());
        assert!(path.ends_with(".db"));
    }

    #[test]
    fn test_default_bind_parses() {
        let addr: SocketAddr = DEFAULT_BIND.parse().unwrap();
        assert_eq!(addr.port(), 3000);
    }
}

// ==========================================
// 整车产线生产跟踪系统 - 配置管理 API
// ==========================================
// 职责: 运行期配置的查询与更新
// 只允许写入已知配置键，值按类型校验后落库
// ==========================================

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::config::config_manager::{config_keys, parse_bool, ConfigManager};

/// 配置项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigItem {
    pub key: String,
    pub value: String,
}

/// 更新配置请求
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateConfigRequest {
    pub value: String,
}

pub struct ConfigApi {
    config_manager: Arc<ConfigManager>,
}

impl ConfigApi {
    pub fn new(config_manager: Arc<ConfigManager>) -> Self {
        Self { config_manager }
    }

    /// 查询全部生效配置（按键排序）
    pub fn list_configs(&self) -> ApiResult<Vec<ConfigItem>> {
        let effective = self
            .config_manager
            .list_effective()
            .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

        Ok(effective
            .into_iter()
            .map(|(key, value)| ConfigItem { key, value })
            .collect())
    }

    /// 更新单个配置
    ///
    /// # 返回
    /// - Err(ApiError::InvalidInput): 未知配置键，或值类型不符
    pub fn update_config(&self, key: &str, req: UpdateConfigRequest) -> ApiResult<ConfigItem> {
        let value = normalize_value(key, &req.value)?;

        self.config_manager
            .set_config_value(key, &value)
            .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

        info!(key = %key, value = %value, "配置已更新");
        Ok(ConfigItem {
            key: key.to_string(),
            value,
        })
    }
}

/// 按配置键校验并规整取值
fn normalize_value(key: &str, raw: &str) -> ApiResult<String> {
    match key {
        config_keys::SUMMARY_INCLUDE_UNPLANNED_MODELS => parse_bool(raw)
            .map(|b| b.to_string())
            .ok_or_else(|| ApiError::InvalidInput(format!("{}应为布尔值: {}", key, raw))),
        config_keys::DASHBOARD_POLL_INTERVAL_SECS => raw
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|v| *v > 0)
            .map(|v| v.to_string())
            .ok_or_else(|| ApiError::InvalidInput(format!("{}应为正整数: {}", key, raw))),
        _ => Err(ApiError::InvalidInput(format!("未知配置键: {}", key))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_value() {
        assert_eq!(
            normalize_value(config_keys::SUMMARY_INCLUDE_UNPLANNED_MODELS, "YES").unwrap(),
            "true"
        );
        assert_eq!(
            normalize_value(config_keys::DASHBOARD_POLL_INTERVAL_SECS, " 10 ").unwrap(),
            "10"
        );
        assert!(normalize_value(config_keys::DASHBOARD_POLL_INTERVAL_SECS, "-5").is_err());
        assert!(normalize_value("unknown.key", "1").is_err());
    }
}

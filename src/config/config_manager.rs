// ==========================================
// 整车产线生产跟踪系统 - 配置管理器
// ==========================================
// 职责: 运行期配置的加载、查询、覆写
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::db::configure_sqlite_connection;
use rusqlite::{params, Connection};
use std::collections::BTreeMap;
use std::error::Error;
use std::sync::{Arc, Mutex};

// ==========================================
// 配置键
// ==========================================
pub mod config_keys {
    // 日汇总: 没有月计划的车型是否出现在汇总中（planned_month 记 0）
    pub const SUMMARY_INCLUDE_UNPLANNED_MODELS: &str = "summary.include_unplanned_models";

    // 看板轮询间隔（秒）
    pub const DASHBOARD_POLL_INTERVAL_SECS: &str = "dashboard.poll_interval_secs";
}

/// 内置默认值（未写入 config_kv 时生效）
pub const DEFAULTS: &[(&str, &str)] = &[
    (config_keys::SUMMARY_INCLUDE_UNPLANNED_MODELS, "false"),
    (config_keys::DASHBOARD_POLL_INTERVAL_SECS, "30"),
];

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    pub fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 读取配置值，缺省时回落到内置默认值
    pub fn get_config_or_default(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        if let Some(v) = self.get_config_value(key)? {
            return Ok(Some(v));
        }
        Ok(DEFAULTS
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.to_string()))
    }

    /// 写入配置值（UPSERT）
    pub fn set_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value, updated_at)
             VALUES ('global', ?1, ?2, datetime('now'))
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    /// 全部生效配置（内置默认值被 config_kv 覆写）
    pub fn list_effective(&self) -> Result<BTreeMap<String, String>, Box<dyn Error>> {
        let mut effective: BTreeMap<String, String> = DEFAULTS
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        let mut stmt = conn.prepare(
            "SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        for row in rows {
            let (key, value) = row?;
            effective.insert(key, value);
        }

        Ok(effective)
    }

    // ===== 业务配置 =====

    /// 日汇总是否包含没有月计划的车型
    pub fn include_unplanned_models(&self) -> Result<bool, Box<dyn Error>> {
        let value = self
            .get_config_or_default(config_keys::SUMMARY_INCLUDE_UNPLANNED_MODELS)?
            .unwrap_or_default();
        Ok(parse_bool(&value).unwrap_or_else(|| {
            tracing::warn!(
                config_key = config_keys::SUMMARY_INCLUDE_UNPLANNED_MODELS,
                raw_value = %value,
                "配置格式错误，按 false 处理"
            );
            false
        }))
    }

    /// 看板轮询间隔（秒）
    pub fn dashboard_poll_interval_secs(&self) -> Result<u64, Box<dyn Error>> {
        let value = self
            .get_config_or_default(config_keys::DASHBOARD_POLL_INTERVAL_SECS)?
            .unwrap_or_default();
        Ok(value.trim().parse::<u64>().ok().filter(|v| *v > 0).unwrap_or(30))
    }
}

/// 解析布尔配置值
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

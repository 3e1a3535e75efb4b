// ==========================================
// 整车产线生产跟踪系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为，保证外键级联在每个连接上生效
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 启动时幂等建表（CREATE TABLE IF NOT EXISTS）
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 全量建表语句
///
/// 说明：
/// - 日期统一存储为 TEXT `YYYY-MM-DD`，时间点存储为 RFC 3339 文本
/// - plan_month 固定为当月 1 日
/// - 日计划通过 month_plan_id 关联月计划，删除月计划级联删除日计划
/// - 工位被日状态引用时不可删除（无级联）
const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS config_kv (
    scope_id TEXT NOT NULL DEFAULT 'global',
    key TEXT NOT NULL,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now')),
    PRIMARY KEY (scope_id, key)
);

CREATE TABLE IF NOT EXISTS models (
    model_id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    description TEXT
);

CREATE TABLE IF NOT EXISTS production_month_plans (
    id TEXT PRIMARY KEY,
    model TEXT NOT NULL,
    plan_month TEXT NOT NULL,
    planned_month INTEGER NOT NULL,
    cumulative INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    UNIQUE (model, plan_month)
);

CREATE TABLE IF NOT EXISTS production_daily_plans (
    id TEXT PRIMARY KEY,
    model TEXT NOT NULL,
    work_date TEXT NOT NULL,
    planned_day INTEGER NOT NULL,
    actual_day INTEGER NOT NULL DEFAULT 0,
    month_plan_id TEXT REFERENCES production_month_plans(id) ON DELETE CASCADE,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    UNIQUE (model, work_date)
);

CREATE INDEX IF NOT EXISTS idx_daily_plans_model_date
    ON production_daily_plans (model, work_date);

CREATE TABLE IF NOT EXISTS production_status (
    id TEXT PRIMARY KEY,
    model_id TEXT NOT NULL,
    vehicle_id TEXT NOT NULL UNIQUE,
    production_date TEXT NOT NULL,
    station_timeline TEXT NOT NULL DEFAULT '[]',
    quality TEXT CHECK (quality IN ('OK', 'NG')),
    remark TEXT
);

CREATE TABLE IF NOT EXISTS station (
    id TEXT PRIMARY KEY,
    station_name TEXT NOT NULL,
    description TEXT,
    is_active INTEGER NOT NULL DEFAULT 1,
    current_status_code TEXT NOT NULL DEFAULT 'IDLE',
    current_status_brief TEXT
);

CREATE TABLE IF NOT EXISTS station_daily_status (
    id TEXT PRIMARY KEY,
    station_id TEXT NOT NULL REFERENCES station(id),
    status_date TEXT NOT NULL,
    start_time TEXT,
    stop_time TEXT,
    total_downtime INTEGER,
    UNIQUE (station_id, status_date)
);

CREATE TABLE IF NOT EXISTS station_downtime_log (
    id TEXT PRIMARY KEY,
    station_daily_id TEXT NOT NULL REFERENCES station_daily_status(id) ON DELETE CASCADE,
    reason TEXT,
    downtime_start TEXT,
    downtime_stop TEXT
);

CREATE INDEX IF NOT EXISTS idx_downtime_log_daily
    ON station_downtime_log (station_daily_id);
"#;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 幂等建表，并登记当前 schema_version
pub fn ensure_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;
    Ok(())
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}

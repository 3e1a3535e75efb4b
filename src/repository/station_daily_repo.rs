// ==========================================
// 整车产线生产跟踪系统 - 工位日状态 / 停机记录数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 表: station_daily_status / station_downtime_log
// ==========================================

use crate::domain::station::{StationDailyStatus, StationDowntimeLog};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::row_utils::{
    fmt_date, fmt_instant, fmt_time, get_opt, parse_date_col, parse_instant_col, parse_time_col,
};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult};
use std::sync::{Arc, Mutex};

const DAILY_COLUMNS: &str = "id, station_id, status_date, start_time, stop_time, total_downtime";

const LOG_COLUMNS: &str = "id, station_daily_id, reason, downtime_start, downtime_stop";

// ==========================================
// StationDailyRepository - 工位日状态仓储
// ==========================================
pub struct StationDailyRepository {
    conn: Arc<Mutex<Connection>>,
}

impl StationDailyRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_daily_row(row: &rusqlite::Row<'_>) -> SqliteResult<StationDailyStatus> {
        Ok(StationDailyStatus {
            id: row.get(0)?,
            station_id: row.get(1)?,
            status_date: parse_date_col(2, &row.get::<_, String>(2)?)?,
            start_time: get_opt(row, 3, parse_time_col)?,
            stop_time: get_opt(row, 4, parse_time_col)?,
            total_downtime: row.get(5)?,
        })
    }

    fn map_log_row(row: &rusqlite::Row<'_>) -> SqliteResult<StationDowntimeLog> {
        Ok(StationDowntimeLog {
            id: row.get(0)?,
            station_daily_id: row.get(1)?,
            reason: row.get(2)?,
            downtime_start: get_opt(row, 3, parse_instant_col)?,
            downtime_stop: get_opt(row, 4, parse_instant_col)?,
        })
    }

    // ==========================================
    // 日状态
    // ==========================================

    pub fn find_all(&self) -> RepositoryResult<Vec<StationDailyStatus>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM station_daily_status ORDER BY status_date DESC, station_id ASC",
            DAILY_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let list = stmt
            .query_map([], Self::map_daily_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(list)
    }

    pub fn find_by_id(&self, id: &str) -> RepositoryResult<Option<StationDailyStatus>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM station_daily_status WHERE id = ?1", DAILY_COLUMNS);
        let status = conn
            .query_row(&sql, params![id], Self::map_daily_row)
            .optional()?;
        Ok(status)
    }

    /// 查询某工位的全部日状态（日期倒序）
    pub fn find_by_station(&self, station_id: &str) -> RepositoryResult<Vec<StationDailyStatus>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM station_daily_status WHERE station_id = ?1 ORDER BY status_date DESC",
            DAILY_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let list = stmt
            .query_map(params![station_id], Self::map_daily_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(list)
    }

    /// 按自然键 (station_id, status_date) 查询
    pub fn find_by_station_date(
        &self,
        station_id: &str,
        status_date: NaiveDate,
    ) -> RepositoryResult<Option<StationDailyStatus>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM station_daily_status WHERE station_id = ?1 AND status_date = ?2",
            DAILY_COLUMNS
        );
        let status = conn
            .query_row(&sql, params![station_id, fmt_date(status_date)], Self::map_daily_row)
            .optional()?;
        Ok(status)
    }

    pub fn insert(&self, status: &StationDailyStatus) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO station_daily_status (
                id, station_id, status_date, start_time, stop_time, total_downtime
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                status.id,
                status.station_id,
                fmt_date(status.status_date),
                status.start_time.map(fmt_time),
                status.stop_time.map(fmt_time),
                status.total_downtime,
            ],
        )?;
        Ok(())
    }

    /// 整行覆盖更新
    pub fn update(&self, status: &StationDailyStatus) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            r#"
            UPDATE station_daily_status
            SET station_id = ?1, status_date = ?2, start_time = ?3, stop_time = ?4, total_downtime = ?5
            WHERE id = ?6
            "#,
            params![
                status.station_id,
                fmt_date(status.status_date),
                status.start_time.map(fmt_time),
                status.stop_time.map(fmt_time),
                status.total_downtime,
                status.id,
            ],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "StationDailyStatus".to_string(),
                id: status.id.clone(),
            });
        }
        Ok(())
    }

    /// 删除日状态（停机记录随外键级联删除）
    pub fn delete(&self, id: &str) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM station_daily_status WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }

    // ==========================================
    // 停机记录
    // ==========================================

    pub fn find_all_logs(&self) -> RepositoryResult<Vec<StationDowntimeLog>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM station_downtime_log ORDER BY downtime_start DESC",
            LOG_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let logs = stmt
            .query_map([], Self::map_log_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(logs)
    }

    pub fn find_log_by_id(&self, id: &str) -> RepositoryResult<Option<StationDowntimeLog>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM station_downtime_log WHERE id = ?1", LOG_COLUMNS);
        let log = conn
            .query_row(&sql, params![id], Self::map_log_row)
            .optional()?;
        Ok(log)
    }

    /// 查询某日状态下的停机记录（按开始时间升序）
    pub fn find_logs_by_daily(&self, station_daily_id: &str) -> RepositoryResult<Vec<StationDowntimeLog>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM station_downtime_log WHERE station_daily_id = ?1 ORDER BY downtime_start ASC",
            LOG_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let logs = stmt
            .query_map(params![station_daily_id], Self::map_log_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(logs)
    }

    /// 查询某工位最近一条未结束的停机记录（跨日）
    pub fn find_latest_open_log_for_station(
        &self,
        station_id: &str,
    ) -> RepositoryResult<Option<StationDowntimeLog>> {
        let conn = self.get_conn()?;
        let log = conn
            .query_row(
                r#"
                SELECT l.id, l.station_daily_id, l.reason, l.downtime_start, l.downtime_stop
                FROM station_downtime_log l
                JOIN station_daily_status d ON d.id = l.station_daily_id
                WHERE d.station_id = ?1
                  AND l.downtime_start IS NOT NULL
                  AND l.downtime_stop IS NULL
                ORDER BY l.downtime_start DESC
                LIMIT 1
                "#,
                params![station_id],
                Self::map_log_row,
            )
            .optional()?;
        Ok(log)
    }

    pub fn insert_log(&self, log: &StationDowntimeLog) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO station_downtime_log (
                id, station_daily_id, reason, downtime_start, downtime_stop
            ) VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                log.id,
                log.station_daily_id,
                log.reason,
                log.downtime_start.map(fmt_instant),
                log.downtime_stop.map(fmt_instant),
            ],
        )?;
        Ok(())
    }

    pub fn update_log(&self, log: &StationDowntimeLog) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            r#"
            UPDATE station_downtime_log
            SET station_daily_id = ?1, reason = ?2, downtime_start = ?3, downtime_stop = ?4
            WHERE id = ?5
            "#,
            params![
                log.station_daily_id,
                log.reason,
                log.downtime_start.map(fmt_instant),
                log.downtime_stop.map(fmt_instant),
                log.id,
            ],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "StationDowntimeLog".to_string(),
                id: log.id.clone(),
            });
        }
        Ok(())
    }

    pub fn delete_log(&self, id: &str) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM station_downtime_log WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }

    /// 结束停机记录并累加所属日状态的停机分钟数（同一事务）
    pub fn close_log_and_accumulate(
        &self,
        log_id: &str,
        station_daily_id: &str,
        stop: DateTime<Utc>,
        minutes: i64,
    ) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        tx.execute(
            "UPDATE station_downtime_log SET downtime_stop = ?1 WHERE id = ?2",
            params![fmt_instant(stop), log_id],
        )?;
        tx.execute(
            r#"
            UPDATE station_daily_status
            SET total_downtime = COALESCE(total_downtime, 0) + ?1
            WHERE id = ?2
            "#,
            params![minutes, station_daily_id],
        )?;

        tx.commit()?;
        Ok(())
    }
}

// ==========================================
// 整车产线生产跟踪系统 - 工位数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::station::Station;
use crate::domain::types::StationStatusCode;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult};
use std::sync::{Arc, Mutex};

const COLUMNS: &str =
    "id, station_name, description, is_active, current_status_code, current_status_brief";

// ==========================================
// StationRepository - 工位仓储
// ==========================================
/// 工位仓储
/// 职责: 管理 station 表的 CRUD 与当前状态写入
pub struct StationRepository {
    conn: Arc<Mutex<Connection>>,
}

impl StationRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &rusqlite::Row<'_>) -> SqliteResult<Station> {
        let code_raw: String = row.get(4)?;
        Ok(Station {
            id: row.get(0)?,
            station_name: row.get(1)?,
            description: row.get(2)?,
            is_active: row.get::<_, i64>(3)? != 0,
            // 未知编码按 IDLE 处理
            current_status_code: StationStatusCode::parse(&code_raw).unwrap_or_default(),
            current_status_brief: row.get(5)?,
        })
    }

    /// 查询全部工位（按名称升序）
    pub fn find_all(&self) -> RepositoryResult<Vec<Station>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM station ORDER BY station_name ASC", COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let stations = stmt
            .query_map([], Self::map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(stations)
    }

    /// 查询启用中的工位
    pub fn find_active(&self) -> RepositoryResult<Vec<Station>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM station WHERE is_active = 1 ORDER BY station_name ASC",
            COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let stations = stmt
            .query_map([], Self::map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(stations)
    }

    pub fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Station>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM station WHERE id = ?1", COLUMNS);
        let station = conn
            .query_row(&sql, params![id], Self::map_row)
            .optional()?;
        Ok(station)
    }

    pub fn insert(&self, station: &Station) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO station (
                id, station_name, description, is_active, current_status_code, current_status_brief
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                station.id,
                station.station_name,
                station.description,
                station.is_active as i64,
                station.current_status_code.as_str(),
                station.current_status_brief,
            ],
        )?;
        Ok(())
    }

    /// 更新基础信息（名称/描述/启用）
    pub fn update(&self, station: &Station) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "UPDATE station SET station_name = ?1, description = ?2, is_active = ?3 WHERE id = ?4",
            params![
                station.station_name,
                station.description,
                station.is_active as i64,
                station.id,
            ],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Station".to_string(),
                id: station.id.clone(),
            });
        }
        Ok(())
    }

    /// 写入当前状态码与状态说明
    pub fn update_status(
        &self,
        id: &str,
        code: StationStatusCode,
        brief: Option<&str>,
    ) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "UPDATE station SET current_status_code = ?1, current_status_brief = ?2 WHERE id = ?3",
            params![code.as_str(), brief, id],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Station".to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    /// 统计引用该工位的日状态记录数
    pub fn count_daily_status_refs(&self, id: &str) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count = conn.query_row(
            "SELECT COUNT(*) FROM station_daily_status WHERE station_id = ?1",
            params![id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    pub fn delete(&self, id: &str) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM station WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }
}

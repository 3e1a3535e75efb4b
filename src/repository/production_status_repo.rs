// ==========================================
// 整车产线生产跟踪系统 - 车辆生产状态数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 表: production_status（station_timeline 为 JSON 文本）
// ==========================================

use crate::domain::production::{ProductionStatus, TimelineEntry};
use crate::domain::types::Quality;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::row_utils::{fmt_date, parse_date_col};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult};
use std::sync::{Arc, Mutex};

const COLUMNS: &str =
    "id, model_id, vehicle_id, production_date, station_timeline, quality, remark";

// ==========================================
// ProductionStatusRepository - 车辆生产状态仓储
// ==========================================
pub struct ProductionStatusRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ProductionStatusRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &rusqlite::Row<'_>) -> SqliteResult<ProductionStatus> {
        let timeline_raw: String = row.get(4)?;
        let station_timeline: Vec<TimelineEntry> = serde_json::from_str(&timeline_raw)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?;

        let quality = row
            .get::<_, Option<String>>(5)?
            .and_then(|s| Quality::parse(&s));

        Ok(ProductionStatus {
            id: row.get(0)?,
            model_id: row.get(1)?,
            vehicle_id: row.get(2)?,
            production_date: parse_date_col(3, &row.get::<_, String>(3)?)?,
            station_timeline,
            quality,
            remark: row.get(6)?,
        })
    }

    fn timeline_json(status: &ProductionStatus) -> RepositoryResult<String> {
        serde_json::to_string(&status.station_timeline).map_err(|e| {
            RepositoryError::FieldValueError {
                field: "station_timeline".to_string(),
                message: e.to_string(),
            }
        })
    }

    /// 查询全部车辆（生产日期倒序，同日按车号）
    pub fn find_all(&self) -> RepositoryResult<Vec<ProductionStatus>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM production_status ORDER BY production_date DESC, vehicle_id ASC",
            COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let list = stmt
            .query_map([], Self::map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(list)
    }

    pub fn find_by_id(&self, id: &str) -> RepositoryResult<Option<ProductionStatus>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM production_status WHERE id = ?1", COLUMNS);
        let status = conn
            .query_row(&sql, params![id], Self::map_row)
            .optional()?;
        Ok(status)
    }

    pub fn find_by_vehicle_id(&self, vehicle_id: &str) -> RepositoryResult<Option<ProductionStatus>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM production_status WHERE vehicle_id = ?1",
            COLUMNS
        );
        let status = conn
            .query_row(&sql, params![vehicle_id], Self::map_row)
            .optional()?;
        Ok(status)
    }

    pub fn insert(&self, status: &ProductionStatus) -> RepositoryResult<()> {
        let timeline = Self::timeline_json(status)?;
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO production_status (
                id, model_id, vehicle_id, production_date, station_timeline, quality, remark
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                status.id,
                status.model_id,
                status.vehicle_id,
                fmt_date(status.production_date),
                timeline,
                status.quality.map(|q| q.as_str()),
                status.remark,
            ],
        )?;
        Ok(())
    }

    /// 整行覆盖更新
    pub fn update(&self, status: &ProductionStatus) -> RepositoryResult<()> {
        let timeline = Self::timeline_json(status)?;
        let conn = self.get_conn()?;
        let affected = conn.execute(
            r#"
            UPDATE production_status
            SET model_id = ?1, vehicle_id = ?2, production_date = ?3,
                station_timeline = ?4, quality = ?5, remark = ?6
            WHERE id = ?7
            "#,
            params![
                status.model_id,
                status.vehicle_id,
                fmt_date(status.production_date),
                timeline,
                status.quality.map(|q| q.as_str()),
                status.remark,
                status.id,
            ],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "ProductionStatus".to_string(),
                id: status.id.clone(),
            });
        }
        Ok(())
    }

    pub fn delete(&self, id: &str) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM production_status WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }
}

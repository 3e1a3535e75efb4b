// ==========================================
// 整车产线生产跟踪系统 - 车型数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::model::VehicleModel;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult};
use std::sync::{Arc, Mutex};

// ==========================================
// VehicleModelRepository - 车型仓储
// ==========================================
pub struct VehicleModelRepository {
    conn: Arc<Mutex<Connection>>,
}

impl VehicleModelRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &rusqlite::Row<'_>) -> SqliteResult<VehicleModel> {
        Ok(VehicleModel {
            model_id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
        })
    }

    /// 查询全部车型（按 model_id 升序）
    pub fn find_all(&self) -> RepositoryResult<Vec<VehicleModel>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT model_id, name, description FROM models ORDER BY model_id ASC",
        )?;
        let models = stmt
            .query_map([], Self::map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(models)
    }

    pub fn find_by_id(&self, model_id: &str) -> RepositoryResult<Option<VehicleModel>> {
        let conn = self.get_conn()?;
        let model = conn
            .query_row(
                "SELECT model_id, name, description FROM models WHERE model_id = ?1",
                params![model_id],
                Self::map_row,
            )
            .optional()?;
        Ok(model)
    }

    pub fn insert(&self, model: &VehicleModel) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO models (model_id, name, description) VALUES (?1, ?2, ?3)",
            params![model.model_id, model.name, model.description],
        )?;
        Ok(())
    }

    /// 更新车型
    ///
    /// # 说明
    /// - `current_id` 与 `model.model_id` 不同时视为改名
    /// - 改名时同一事务内迁移月/日计划与车辆记录上的车型编码
    pub fn update(&self, current_id: &str, model: &VehicleModel) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        let affected = tx.execute(
            "UPDATE models SET model_id = ?1, name = ?2, description = ?3 WHERE model_id = ?4",
            params![model.model_id, model.name, model.description, current_id],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Model".to_string(),
                id: current_id.to_string(),
            });
        }

        if current_id != model.model_id {
            tx.execute(
                "UPDATE production_month_plans SET model = ?1 WHERE model = ?2",
                params![model.model_id, current_id],
            )?;
            tx.execute(
                "UPDATE production_daily_plans SET model = ?1 WHERE model = ?2",
                params![model.model_id, current_id],
            )?;
            tx.execute(
                "UPDATE production_status SET model_id = ?1 WHERE model_id = ?2",
                params![model.model_id, current_id],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    /// 删除车型，并级联删除该车型的月/日计划
    ///
    /// # 返回
    /// - Ok(true): 已删除
    /// - Ok(false): 车型不存在
    pub fn delete_cascade_plans(&self, model_id: &str) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        let affected = tx.execute("DELETE FROM models WHERE model_id = ?1", params![model_id])?;
        if affected == 0 {
            return Ok(false);
        }

        tx.execute(
            "DELETE FROM production_daily_plans WHERE model = ?1",
            params![model_id],
        )?;
        tx.execute(
            "DELETE FROM production_month_plans WHERE model = ?1",
            params![model_id],
        )?;

        tx.commit()?;
        Ok(true)
    }
}

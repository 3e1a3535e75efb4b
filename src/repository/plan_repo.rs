// ==========================================
// 整车产线生产跟踪系统 - 生产计划数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 表: production_month_plans / production_daily_plans
// ==========================================

use crate::domain::plan::{DailyPlan, MonthPlan, SummaryRow};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::row_utils::{fmt_date, fmt_instant, parse_date_col, parse_instant_col};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult};
use std::sync::{Arc, Mutex};

const MONTH_COLUMNS: &str =
    "id, model, plan_month, planned_month, cumulative, created_at, updated_at";

const DAILY_COLUMNS: &str =
    "id, model, work_date, planned_day, actual_day, month_plan_id, created_at, updated_at";

// ==========================================
// ProductionPlanRepository - 月/日计划仓储
// ==========================================
pub struct ProductionPlanRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ProductionPlanRepository {
    /// 创建新的ProductionPlanRepository实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_month_row(row: &rusqlite::Row<'_>) -> SqliteResult<MonthPlan> {
        Ok(MonthPlan {
            id: row.get(0)?,
            model: row.get(1)?,
            plan_month: parse_date_col(2, &row.get::<_, String>(2)?)?,
            planned_month: row.get(3)?,
            cumulative: row.get(4)?,
            created_at: parse_instant_col(5, &row.get::<_, String>(5)?)?,
            updated_at: parse_instant_col(6, &row.get::<_, String>(6)?)?,
        })
    }

    fn map_daily_row(row: &rusqlite::Row<'_>) -> SqliteResult<DailyPlan> {
        Ok(DailyPlan {
            id: row.get(0)?,
            model: row.get(1)?,
            work_date: parse_date_col(2, &row.get::<_, String>(2)?)?,
            planned_day: row.get(3)?,
            actual_day: row.get(4)?,
            month_plan_id: row.get(5)?,
            created_at: parse_instant_col(6, &row.get::<_, String>(6)?)?,
            updated_at: parse_instant_col(7, &row.get::<_, String>(7)?)?,
        })
    }

    // ==========================================
    // 月计划
    // ==========================================

    /// 按自然键 (model, plan_month) 查询月计划
    pub fn find_month_plan(
        &self,
        model: &str,
        plan_month: NaiveDate,
    ) -> RepositoryResult<Option<MonthPlan>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM production_month_plans WHERE model = ?1 AND plan_month = ?2",
            MONTH_COLUMNS
        );
        let plan = conn
            .query_row(&sql, params![model, fmt_date(plan_month)], Self::map_month_row)
            .optional()?;
        Ok(plan)
    }

    pub fn find_month_plan_by_id(&self, id: &str) -> RepositoryResult<Option<MonthPlan>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM production_month_plans WHERE id = ?1",
            MONTH_COLUMNS
        );
        let plan = conn
            .query_row(&sql, params![id], Self::map_month_row)
            .optional()?;
        Ok(plan)
    }

    /// 查询某月全部车型的月计划（按车型升序）
    pub fn list_month_plans(&self, plan_month: NaiveDate) -> RepositoryResult<Vec<MonthPlan>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM production_month_plans WHERE plan_month = ?1 ORDER BY model ASC",
            MONTH_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let plans = stmt
            .query_map(params![fmt_date(plan_month)], Self::map_month_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(plans)
    }

    /// 新增月计划
    ///
    /// # 说明
    /// - 同一事务内把该车型当月尚未关联的日计划挂到新月计划上
    ///
    /// # 返回
    /// - Ok(usize): 被关联的日计划条数
    pub fn insert_month_plan(&self, plan: &MonthPlan) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        tx.execute(
            r#"
            INSERT INTO production_month_plans (
                id, model, plan_month, planned_month, cumulative, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                plan.id,
                plan.model,
                fmt_date(plan.plan_month),
                plan.planned_month,
                plan.cumulative,
                fmt_instant(plan.created_at),
                fmt_instant(plan.updated_at),
            ],
        )?;

        let linked = tx.execute(
            r#"
            UPDATE production_daily_plans
            SET month_plan_id = ?1
            WHERE model = ?2
              AND month_plan_id IS NULL
              AND work_date BETWEEN ?3 AND date(?3, '+1 month', '-1 day')
            "#,
            params![plan.id, plan.model, fmt_date(plan.plan_month)],
        )?;

        tx.commit()?;
        Ok(linked)
    }

    pub fn update_month_planned(
        &self,
        id: &str,
        planned_month: i64,
        updated_at: DateTime<Utc>,
    ) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "UPDATE production_month_plans SET planned_month = ?1, updated_at = ?2 WHERE id = ?3",
            params![planned_month, fmt_instant(updated_at), id],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "MonthPlan".to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    /// 删除月计划
    ///
    /// # 说明
    /// - 先删除该车型当月的全部日计划，再删除月计划（同一事务）
    ///
    /// # 返回
    /// - Ok(Some(usize)): 已删除，附带被删除的日计划条数
    /// - Ok(None): 月计划不存在
    pub fn delete_month_plan_cascade(&self, id: &str) -> RepositoryResult<Option<usize>> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        let key: Option<(String, String)> = tx
            .query_row(
                "SELECT model, plan_month FROM production_month_plans WHERE id = ?1",
                params![id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let Some((model, plan_month)) = key else {
            return Ok(None);
        };

        let removed_days = tx.execute(
            r#"
            DELETE FROM production_daily_plans
            WHERE model = ?1
              AND work_date BETWEEN ?2 AND date(?2, '+1 month', '-1 day')
            "#,
            params![model, plan_month],
        )?;
        tx.execute("DELETE FROM production_month_plans WHERE id = ?1", params![id])?;

        tx.commit()?;
        Ok(Some(removed_days))
    }

    // ==========================================
    // 日计划
    // ==========================================

    /// 按自然键 (model, work_date) 查询日计划
    pub fn find_daily_plan(
        &self,
        model: &str,
        work_date: NaiveDate,
    ) -> RepositoryResult<Option<DailyPlan>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM production_daily_plans WHERE model = ?1 AND work_date = ?2",
            DAILY_COLUMNS
        );
        let plan = conn
            .query_row(&sql, params![model, fmt_date(work_date)], Self::map_daily_row)
            .optional()?;
        Ok(plan)
    }

    pub fn find_daily_plan_by_id(&self, id: &str) -> RepositoryResult<Option<DailyPlan>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM production_daily_plans WHERE id = ?1",
            DAILY_COLUMNS
        );
        let plan = conn
            .query_row(&sql, params![id], Self::map_daily_row)
            .optional()?;
        Ok(plan)
    }

    /// 查询某日全部车型的日计划（按车型升序）
    pub fn list_daily_plans(&self, work_date: NaiveDate) -> RepositoryResult<Vec<DailyPlan>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM production_daily_plans WHERE work_date = ?1 ORDER BY model ASC",
            DAILY_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let plans = stmt
            .query_map(params![fmt_date(work_date)], Self::map_daily_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(plans)
    }

    pub fn insert_daily_plan(&self, plan: &DailyPlan) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO production_daily_plans (
                id, model, work_date, planned_day, actual_day, month_plan_id, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                plan.id,
                plan.model,
                fmt_date(plan.work_date),
                plan.planned_day,
                plan.actual_day,
                plan.month_plan_id,
                fmt_instant(plan.created_at),
                fmt_instant(plan.updated_at),
            ],
        )?;
        Ok(())
    }

    /// 覆盖日计划的可变字段（planned/actual/month link）
    pub fn update_daily_plan(&self, plan: &DailyPlan) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            r#"
            UPDATE production_daily_plans
            SET planned_day = ?1, actual_day = ?2, month_plan_id = ?3, updated_at = ?4
            WHERE id = ?5
            "#,
            params![
                plan.planned_day,
                plan.actual_day,
                plan.month_plan_id,
                fmt_instant(plan.updated_at),
                plan.id,
            ],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "DailyPlan".to_string(),
                id: plan.id.clone(),
            });
        }
        Ok(())
    }

    /// 删除日计划
    ///
    /// # 返回
    /// - Ok(true): 已删除
    /// - Ok(false): 不存在
    pub fn delete_daily_plan(&self, id: &str) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "DELETE FROM production_daily_plans WHERE id = ?1",
            params![id],
        )?;
        Ok(affected > 0)
    }

    // ==========================================
    // 实绩计数
    // ==========================================

    /// 原子调整某车型某日的实绩计数
    ///
    /// # 说明
    /// - 日计划 actual_day 与所关联月计划 cumulative 在同一事务内调整
    /// - 使用 `x = MAX(x + delta, 0)`，递减时下限为 0
    ///
    /// # 返回
    /// - Ok(true): 找到日计划并已调整
    /// - Ok(false): 该车型该日没有日计划
    pub fn adjust_actual_counters(
        &self,
        model: &str,
        work_date: NaiveDate,
        delta: i64,
        now: DateTime<Utc>,
    ) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        let target: Option<(String, Option<String>)> = tx
            .query_row(
                "SELECT id, month_plan_id FROM production_daily_plans WHERE model = ?1 AND work_date = ?2",
                params![model, fmt_date(work_date)],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let Some((daily_id, month_plan_id)) = target else {
            return Ok(false);
        };

        let ts = fmt_instant(now);
        tx.execute(
            r#"
            UPDATE production_daily_plans
            SET actual_day = MAX(actual_day + ?1, 0), updated_at = ?2
            WHERE id = ?3
            "#,
            params![delta, ts, daily_id],
        )?;

        if let Some(month_plan_id) = month_plan_id {
            tx.execute(
                r#"
                UPDATE production_month_plans
                SET cumulative = MAX(cumulative + ?1, 0), updated_at = ?2
                WHERE id = ?3
                "#,
                params![delta, ts, month_plan_id],
            )?;
        }

        tx.commit()?;
        Ok(true)
    }

    // ==========================================
    // 日汇总
    // ==========================================

    /// 查询某日的汇总行
    ///
    /// # 参数
    /// - `date`: 汇总日期
    /// - `include_unplanned`: 是否包含没有月计划的车型（planned_month 记为 0）
    ///
    /// # 说明
    /// - cumulative = 该车型月初至 `date`（含）全部日计划 actual_day 之和
    pub fn daily_summary_rows(
        &self,
        date: NaiveDate,
        include_unplanned: bool,
    ) -> RepositoryResult<Vec<SummaryRow>> {
        let conn = self.get_conn()?;
        let join = if include_unplanned { "LEFT JOIN" } else { "JOIN" };
        let sql = format!(
            r#"
            SELECT
                d.model,
                d.planned_day,
                d.actual_day,
                COALESCE(m.planned_month, 0) AS planned_month,
                (
                    SELECT COALESCE(SUM(r.actual_day), 0)
                    FROM production_daily_plans r
                    WHERE r.model = d.model
                      AND r.work_date BETWEEN date(d.work_date, 'start of month') AND d.work_date
                ) AS cumulative
            FROM production_daily_plans d
            {} production_month_plans m
              ON m.model = d.model
             AND m.plan_month = date(d.work_date, 'start of month')
            WHERE d.work_date = ?1
            ORDER BY d.model ASC
            "#,
            join
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![fmt_date(date)], |row| {
                Ok(SummaryRow {
                    model: row.get(0)?,
                    planned_day: row.get(1)?,
                    actual_day: row.get(2)?,
                    planned_month: row.get(3)?,
                    cumulative: row.get(4)?,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;

        tracing::debug!(date = %date, rows = rows.len(), "日汇总查询完成");
        Ok(rows)
    }
}

// ==========================================
// 整车产线生产跟踪系统 - 生产计划 API
// ==========================================
// 职责:
// - 月计划 / 日计划 upsert（按自然键更新或新建）
// - 计划查询与删除
// - 日汇总（计划 vs 实绩 + 月累计）
// ==========================================

use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::{
    parse_date, parse_month, require_bounded, require_quantity, MODEL_ID_MAX_LEN,
};
use crate::config::config_manager::ConfigManager;
use crate::domain::plan::{month_start, DailyPlan, DailySummary, MonthPlan};
use crate::engine::summary::SummaryCalculator;
use crate::repository::plan_repo::ProductionPlanRepository;

/// 月计划 upsert 请求
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertMonthPlanRequest {
    pub model: String,
    /// YYYY-MM
    #[serde(alias = "planMonth")]
    pub month: String,
    pub planned_month: i64,
}

/// 日计划 upsert 请求
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertDailyPlanRequest {
    pub model: String,
    /// YYYY-MM-DD
    #[serde(alias = "workDate")]
    pub date: String,
    pub planned_day: i64,
    #[serde(default)]
    pub actual_day: Option<i64>,
}

pub struct PlanApi {
    plan_repo: Arc<ProductionPlanRepository>,
    config_manager: Arc<ConfigManager>,
    summary_calculator: SummaryCalculator,
}

impl PlanApi {
    pub fn new(plan_repo: Arc<ProductionPlanRepository>, config_manager: Arc<ConfigManager>) -> Self {
        Self {
            plan_repo,
            config_manager,
            summary_calculator: SummaryCalculator::new(),
        }
    }

    // ==========================================
    // 月计划
    // ==========================================

    /// 月计划 upsert
    ///
    /// - (model, 当月1日) 已存在: 覆写 planned_month
    /// - 不存在: 新建（cumulative = 0），并关联该车型当月尚未关联的日计划
    pub fn upsert_month_plan(&self, req: UpsertMonthPlanRequest) -> ApiResult<MonthPlan> {
        let model = require_bounded("车型", &req.model, MODEL_ID_MAX_LEN)?;
        let plan_month = parse_month("月份", &req.month)?;
        let planned_month = require_quantity("月计划数量", req.planned_month)?;
        let now = Utc::now();

        if let Some(existing) = self.plan_repo.find_month_plan(&model, plan_month)? {
            self.plan_repo
                .update_month_planned(&existing.id, planned_month, now)?;
            info!(model = %model, month = %plan_month, planned_month, "月计划已更新");
            return self.get_month_plan(&existing.id);
        }

        let plan = MonthPlan {
            id: Uuid::new_v4().to_string(),
            model,
            plan_month,
            planned_month,
            cumulative: 0,
            created_at: now,
            updated_at: now,
        };
        let linked = self.plan_repo.insert_month_plan(&plan)?;
        info!(
            model = %plan.model,
            month = %plan.plan_month,
            planned_month,
            linked_daily_plans = linked,
            "月计划已创建"
        );
        Ok(plan)
    }

    pub fn get_month_plan(&self, id: &str) -> ApiResult<MonthPlan> {
        self.plan_repo
            .find_month_plan_by_id(id)?
            .ok_or_else(|| ApiError::NotFound(format!("月计划{}不存在", id)))
    }

    /// 查询某月全部月计划（按车型排序）
    pub fn list_month_plans(&self, month: &str) -> ApiResult<Vec<MonthPlan>> {
        let plan_month = parse_month("月份", month)?;
        Ok(self.plan_repo.list_month_plans(plan_month)?)
    }

    /// 删除月计划（先删除该车型当月日计划）
    pub fn delete_month_plan(&self, id: &str) -> ApiResult<()> {
        match self.plan_repo.delete_month_plan_cascade(id)? {
            Some(removed_days) => {
                info!(month_plan_id = %id, removed_daily_plans = removed_days, "月计划已删除");
                Ok(())
            }
            None => Err(ApiError::NotFound(format!("月计划{}不存在", id))),
        }
    }

    // ==========================================
    // 日计划
    // ==========================================

    /// 日计划 upsert
    ///
    /// - (model, date) 已存在: 覆写 planned_day，提供 actual_day 时一并覆写
    /// - 不存在: 新建（actual_day 缺省为 0）
    /// - 月计划关联按 (model, 当月1日) 解析
    pub fn upsert_daily_plan(&self, req: UpsertDailyPlanRequest) -> ApiResult<DailyPlan> {
        let model = require_bounded("车型", &req.model, MODEL_ID_MAX_LEN)?;
        let work_date = parse_date("日期", &req.date)?;
        let planned_day = require_quantity("日计划数量", req.planned_day)?;
        let actual_day = req
            .actual_day
            .map(|v| require_quantity("日实绩数量", v))
            .transpose()?;
        let now = Utc::now();

        let month_plan_id = self
            .plan_repo
            .find_month_plan(&model, month_start(work_date))?
            .map(|p| p.id);

        if let Some(mut existing) = self.plan_repo.find_daily_plan(&model, work_date)? {
            existing.planned_day = planned_day;
            if let Some(actual) = actual_day {
                existing.actual_day = actual;
            }
            if existing.month_plan_id.is_none() {
                existing.month_plan_id = month_plan_id;
            }
            existing.updated_at = now;

            self.plan_repo.update_daily_plan(&existing)?;
            info!(model = %model, date = %work_date, planned_day, "日计划已更新");
            return Ok(existing);
        }

        let plan = DailyPlan {
            id: Uuid::new_v4().to_string(),
            model,
            work_date,
            planned_day,
            actual_day: actual_day.unwrap_or(0),
            month_plan_id,
            created_at: now,
            updated_at: now,
        };
        self.plan_repo.insert_daily_plan(&plan)?;
        info!(model = %plan.model, date = %work_date, planned_day, "日计划已创建");
        Ok(plan)
    }

    /// 查询某日全部日计划（按车型排序）
    pub fn list_daily_plans(&self, date: &str) -> ApiResult<Vec<DailyPlan>> {
        let work_date = parse_date("日期", date)?;
        Ok(self.plan_repo.list_daily_plans(work_date)?)
    }

    pub fn delete_daily_plan(&self, id: &str) -> ApiResult<()> {
        if !self.plan_repo.delete_daily_plan(id)? {
            return Err(ApiError::NotFound(format!("日计划{}不存在", id)));
        }
        info!(daily_plan_id = %id, "日计划已删除");
        Ok(())
    }

    // ==========================================
    // 日汇总
    // ==========================================

    /// 某日生产汇总
    ///
    /// cumulative = 车型当月1日至该日（含）actual_day 之和
    pub fn daily_summary(&self, date: &str) -> ApiResult<DailySummary> {
        let date = parse_date("日期", date)?;
        let include_unplanned = self
            .config_manager
            .include_unplanned_models()
            .map_err(|e| ApiError::InternalError(format!("读取汇总配置失败: {}", e)))?;

        let rows = self.plan_repo.daily_summary_rows(date, include_unplanned)?;
        debug!(date = %date, rows = rows.len(), include_unplanned, "日汇总查询");

        Ok(self.summary_calculator.build(date, rows))
    }
}

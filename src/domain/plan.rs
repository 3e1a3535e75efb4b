// ==========================================
// 整车产线生产跟踪系统 - 生产计划领域模型
// ==========================================
// 对齐: production_month_plans / production_daily_plans 表
// 约束:
// - 月计划自然键 (model, plan_month)，plan_month 恒为当月 1 日
// - 日计划自然键 (model, work_date)
// ==========================================

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// MonthPlan - 月度计划
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthPlan {
    pub id: String,
    pub model: String,
    pub plan_month: NaiveDate, // 当月 1 日
    pub planned_month: i64,    // 月计划数量
    pub cumulative: i64,       // 质检事件累计的实绩计数
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ==========================================
// DailyPlan - 日计划与实绩
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPlan {
    pub id: String,
    pub model: String,
    pub work_date: NaiveDate,
    pub planned_day: i64,
    pub actual_day: i64,
    pub month_plan_id: Option<String>, // 所属月计划（可能尚未建立）
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ==========================================
// 日汇总 (Summary)
// ==========================================

/// 单车型汇总行
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRow {
    pub model: String,
    pub planned_day: i64,
    pub actual_day: i64,
    pub planned_month: i64,
    pub cumulative: i64, // 月初至当日 actual_day 之和
}

/// 合计行
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryTotal {
    pub planned_day: i64,
    pub actual_day: i64,
    pub planned_month: i64,
    pub cumulative: i64,
}

/// 某日生产汇总
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    pub date: NaiveDate,
    pub rows: Vec<SummaryRow>,
    pub total: SummaryTotal,
}

/// 计算日期所在月的 1 日
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

// ==========================================
// 整车产线生产跟踪系统 - 输入校验
// ==========================================
// 职责: 请求参数的格式与取值校验，失败统一返回 ApiError::InvalidInput
// ==========================================

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::api::error::{ApiError, ApiResult};
use crate::domain::plan::month_start;

pub const MODEL_ID_MAX_LEN: usize = 50;
pub const NAME_MAX_LEN: usize = 100;
/// 数量/分钟字段上限，保证汇总求和不溢出
pub const MAX_QUANTITY: i64 = 1_000_000_000;

/// 非空字符串（去除首尾空白后）
pub fn require_non_empty(field: &str, value: &str) -> ApiResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::InvalidInput(format!("{}不能为空", field)));
    }
    Ok(trimmed.to_string())
}

/// 非空且不超过 max_len 个字符
pub fn require_bounded(field: &str, value: &str, max_len: usize) -> ApiResult<String> {
    let v = require_non_empty(field, value)?;
    if v.chars().count() > max_len {
        return Err(ApiError::InvalidInput(format!(
            "{}长度不能超过{}个字符",
            field, max_len
        )));
    }
    Ok(v)
}

/// 数量: 0..=MAX_QUANTITY
pub fn require_quantity(field: &str, value: i64) -> ApiResult<i64> {
    if value < 0 {
        return Err(ApiError::InvalidInput(format!(
            "{}不能为负数: {}",
            field, value
        )));
    }
    if value > MAX_QUANTITY {
        return Err(ApiError::InvalidInput(format!(
            "{}不能超过{}: {}",
            field, MAX_QUANTITY, value
        )));
    }
    Ok(value)
}

/// 解析日期 YYYY-MM-DD
pub fn parse_date(field: &str, raw: &str) -> ApiResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
        ApiError::InvalidInput(format!("{}格式错误（应为YYYY-MM-DD）: {}", field, raw))
    })
}

/// 解析月份 YYYY-MM，返回当月 1 日
pub fn parse_month(field: &str, raw: &str) -> ApiResult<NaiveDate> {
    let raw_trimmed = raw.trim();
    // 兼容直接传入当月任意日期
    if let Ok(date) = NaiveDate::parse_from_str(raw_trimmed, "%Y-%m-%d") {
        return Ok(month_start(date));
    }
    NaiveDate::parse_from_str(&format!("{}-01", raw_trimmed), "%Y-%m-%d").map_err(|_| {
        ApiError::InvalidInput(format!("{}格式错误（应为YYYY-MM）: {}", field, raw))
    })
}

/// 解析时刻 HH:MM:SS（也接受 HH:MM）
pub fn parse_time(field: &str, raw: &str) -> ApiResult<NaiveTime> {
    let raw_trimmed = raw.trim();
    NaiveTime::parse_from_str(raw_trimmed, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw_trimmed, "%H:%M"))
        .map_err(|_| ApiError::InvalidInput(format!("{}格式错误（应为HH:MM:SS）: {}", field, raw)))
}

/// 解析 RFC 3339 时间点
pub fn parse_instant(field: &str, raw: &str) -> ApiResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|_| ApiError::InvalidInput(format!("{}格式错误（应为RFC 3339）: {}", field, raw)))
}

/// 可选字段: 空白字符串视为未提供
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// ==========================================
// 整车产线生产跟踪系统 - 行映射工具
// ==========================================
// 日期/时刻/时间点与 TEXT 列之间的统一编解码
// ==========================================

use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, Utc};
use rusqlite::types::Type;

pub const DATE_FMT: &str = "%Y-%m-%d";
pub const TIME_FMT: &str = "%H:%M:%S";

fn conversion_error<E>(idx: usize, e: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
}

pub fn fmt_date(date: NaiveDate) -> String {
    date.format(DATE_FMT).to_string()
}

pub fn fmt_time(time: NaiveTime) -> String {
    time.format(TIME_FMT).to_string()
}

pub fn fmt_instant(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

pub fn parse_date_col(idx: usize, raw: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FMT).map_err(|e| conversion_error(idx, e))
}

pub fn parse_time_col(idx: usize, raw: &str) -> rusqlite::Result<NaiveTime> {
    NaiveTime::parse_from_str(raw, TIME_FMT).map_err(|e| conversion_error(idx, e))
}

pub fn parse_instant_col(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| conversion_error(idx, e))
}

/// 读取可空的 TEXT 列并按给定解析函数转换
pub fn get_opt<T>(
    row: &rusqlite::Row<'_>,
    idx: usize,
    parse: fn(usize, &str) -> rusqlite::Result<T>,
) -> rusqlite::Result<Option<T>> {
    row.get::<_, Option<String>>(idx)?
        .map(|raw| parse(idx, &raw))
        .transpose()
}

// ==========================================
// 整车产线生产跟踪系统 - 工位领域模型
// ==========================================
// 对齐: station / station_daily_status / station_downtime_log 表
// ==========================================

use crate::domain::types::StationStatusCode;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// Station - 工位
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    pub id: String,
    pub station_name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub current_status_code: StationStatusCode,
    pub current_status_brief: Option<String>, // 当前状态说明（停机原因等）
}

// ==========================================
// StationDailyStatus - 工位日状态
// ==========================================
// 自然键: (station_id, status_date)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationDailyStatus {
    pub id: String,
    #[serde(rename = "stationID")]
    pub station_id: String,
    pub status_date: NaiveDate,
    pub start_time: Option<NaiveTime>, // 当日开工时刻
    pub stop_time: Option<NaiveTime>,  // 当日收工时刻
    pub total_downtime: Option<i64>,   // 当日累计停机（分钟）
}

// ==========================================
// StationDowntimeLog - 停机记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationDowntimeLog {
    pub id: String,
    #[serde(rename = "stationDailyID")]
    pub station_daily_id: String,
    #[serde(rename = "downTimeLog")]
    pub reason: Option<String>,
    pub downtime_start: Option<DateTime<Utc>>,
    pub downtime_stop: Option<DateTime<Utc>>,
}

impl StationDowntimeLog {
    /// 停机是否仍在持续
    pub fn is_open(&self) -> bool {
        self.downtime_start.is_some() && self.downtime_stop.is_none()
    }

    /// 停机时长（整分钟，向下取整）；起止不完整时返回 None
    pub fn duration_minutes(&self) -> Option<i64> {
        match (self.downtime_start, self.downtime_stop) {
            (Some(start), Some(stop)) => Some((stop - start).num_minutes().max(0)),
            _ => None,
        }
    }
}

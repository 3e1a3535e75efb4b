// ==========================================
// 整车产线生产跟踪系统 - 车辆生产状态领域模型
// ==========================================
// 对齐: production_status 表，station_timeline 以 JSON 存储
// 红线: 时间线中至多一条记录缺少 end_time，且只能是最后一条
// ==========================================

use crate::domain::types::Quality;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// TimelineEntry - 车辆在某工位的停留记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    #[serde(rename = "stationID")]
    pub station_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub station_name: Option<String>,
    pub start_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
}

impl TimelineEntry {
    pub fn is_open(&self) -> bool {
        self.end_time.is_none()
    }
}

// ==========================================
// ProductionStatus - 单车生产状态
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionStatus {
    pub id: String,
    #[serde(rename = "modelID")]
    pub model_id: String,
    #[serde(rename = "vehicleID")]
    pub vehicle_id: String,
    pub production_date: NaiveDate,
    pub station_timeline: Vec<TimelineEntry>,
    pub quality: Option<Quality>,
    pub remark: Option<String>,
}

// ==========================================
// Trait: VehicleTimeline
// ==========================================
// 用途: 工位时间线的推进规则（顺序、不重叠）
pub trait VehicleTimeline {
    /// 当前所在工位（唯一未结束的记录）
    fn open_entry(&self) -> Option<&TimelineEntry>;

    /// 新的进站时间是否合法
    ///
    /// # 返回
    /// - `false`: 早于当前工位的进站时间（会产生 end < start 的记录）
    fn accepts_start(&self, start_time: DateTime<Utc>) -> bool;

    /// 进入新工位
    ///
    /// 若最后一条记录未结束，以本次 start_time 作为其 end_time
    fn enter_station(
        &mut self,
        station_id: String,
        station_name: Option<String>,
        start_time: DateTime<Utc>,
    );

    /// 结束当前工位
    ///
    /// # 返回
    /// - `true`: 存在未结束记录并已关闭
    /// - `false`: 无需关闭
    fn close_open_entry(&mut self, at: DateTime<Utc>) -> bool;

    /// 未结束记录的数量（正常情况下 ≤ 1）
    fn open_entry_count(&self) -> usize;
}

impl VehicleTimeline for ProductionStatus {
    fn open_entry(&self) -> Option<&TimelineEntry> {
        self.station_timeline.last().filter(|e| e.is_open())
    }

    fn accepts_start(&self, start_time: DateTime<Utc>) -> bool {
        match self.open_entry() {
            Some(open) => start_time >= open.start_time,
            None => true,
        }
    }

    fn enter_station(
        &mut self,
        station_id: String,
        station_name: Option<String>,
        start_time: DateTime<Utc>,
    ) {
        self.close_open_entry(start_time);
        self.station_timeline.push(TimelineEntry {
            station_id,
            station_name,
            start_time,
            end_time: None,
        });
    }

    fn close_open_entry(&mut self, at: DateTime<Utc>) -> bool {
        match self.station_timeline.last_mut() {
            Some(last) if last.is_open() => {
                last.end_time = Some(at);
                true
            }
            _ => false,
        }
    }

    fn open_entry_count(&self) -> usize {
        self.station_timeline.iter().filter(|e| e.is_open()).count()
    }
}

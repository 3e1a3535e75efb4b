// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use chrono::{DateTime, Local, TimeZone, Utc};

use assembly_line_tracker::api::station_api::UpdateStationStatusRequest;
use assembly_line_tracker::api::station_daily_api::{
    CreateDowntimeLogRequest, CreateStationDailyStatusRequest,
};

/// RFC 3339 字符串 → UTC 时间点
pub fn ts(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .expect("时间格式错误")
        .with_timezone(&Utc)
}

/// 本地时间点（工位状态记账使用本地日历）
pub fn local_at(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> DateTime<Local> {
    Local
        .with_ymd_and_hms(year, month, day, hour, minute, second)
        .earliest()
        .expect("本地时间无效")
}

// ==========================================
// 工位状态变更请求
// ==========================================

pub fn status_req(code: &str, brief: Option<&str>) -> UpdateStationStatusRequest {
    UpdateStationStatusRequest {
        status_code: code.to_string(),
        brief: brief.map(|b| b.to_string()),
    }
}

// ==========================================
// 工位日状态请求构建器
// ==========================================

pub struct DailyStatusBuilder {
    station_id: String,
    status_date: String,
    start_time: Option<String>,
    stop_time: Option<String>,
    total_downtime: Option<i64>,
}

impl DailyStatusBuilder {
    pub fn new(station_id: &str, status_date: &str) -> Self {
        Self {
            station_id: station_id.to_string(),
            status_date: status_date.to_string(),
            start_time: None,
            stop_time: None,
            total_downtime: None,
        }
    }

    pub fn start_time(mut self, t: &str) -> Self {
        self.start_time = Some(t.to_string());
        self
    }

    pub fn stop_time(mut self, t: &str) -> Self {
        self.stop_time = Some(t.to_string());
        self
    }

    pub fn total_downtime(mut self, minutes: i64) -> Self {
        self.total_downtime = Some(minutes);
        self
    }

    pub fn build(self) -> CreateStationDailyStatusRequest {
        CreateStationDailyStatusRequest {
            station_id: self.station_id,
            status_date: self.status_date,
            start_time: self.start_time,
            stop_time: self.stop_time,
            total_downtime: self.total_downtime,
        }
    }
}

// ==========================================
// 停机记录请求构建器
// ==========================================

pub struct DowntimeLogBuilder {
    station_daily_id: String,
    reason: Option<String>,
    downtime_start: Option<String>,
    downtime_stop: Option<String>,
}

impl DowntimeLogBuilder {
    pub fn new(station_daily_id: &str) -> Self {
        Self {
            station_daily_id: station_daily_id.to_string(),
            reason: None,
            downtime_start: None,
            downtime_stop: None,
        }
    }

    pub fn reason(mut self, reason: &str) -> Self {
        self.reason = Some(reason.to_string());
        self
    }

    pub fn window(mut self, start: &str, stop: Option<&str>) -> Self {
        self.downtime_start = Some(start.to_string());
        self.downtime_stop = stop.map(|s| s.to_string());
        self
    }

    pub fn build(self) -> CreateDowntimeLogRequest {
        CreateDowntimeLogRequest {
            station_daily_id: self.station_daily_id,
            reason: self.reason,
            downtime_start: self.downtime_start,
            downtime_stop: self.downtime_stop,
        }
    }
}

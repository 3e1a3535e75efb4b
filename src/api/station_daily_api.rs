// ==========================================
// 整车产线生产跟踪系统 - 工位日状态 / 停机记录 API
// ==========================================
// 职责:
// - 工位日状态维护（自然键: stationID + statusDate）
// - 停机记录维护（删除日状态时级联删除）
// ==========================================

use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::{
    normalize_optional, parse_date, parse_instant, parse_time, require_non_empty,
    require_quantity,
};
use crate::domain::station::{StationDailyStatus, StationDowntimeLog};
use crate::repository::station_daily_repo::StationDailyRepository;
use crate::repository::station_repo::StationRepository;

// ==========================================
// 请求 DTO
// ==========================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStationDailyStatusRequest {
    #[serde(rename = "stationID", alias = "stationId")]
    pub station_id: String,
    pub status_date: String,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub stop_time: Option<String>,
    #[serde(default)]
    pub total_downtime: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStationDailyStatusRequest {
    #[serde(default, rename = "stationID", alias = "stationId")]
    pub station_id: Option<String>,
    #[serde(default)]
    pub status_date: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub stop_time: Option<String>,
    #[serde(default)]
    pub total_downtime: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDowntimeLogRequest {
    #[serde(rename = "stationDailyID", alias = "stationDailyId")]
    pub station_daily_id: String,
    #[serde(default, rename = "downTimeLog", alias = "reason")]
    pub reason: Option<String>,
    #[serde(default)]
    pub downtime_start: Option<String>,
    #[serde(default)]
    pub downtime_stop: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDowntimeLogRequest {
    #[serde(default, rename = "downTimeLog", alias = "reason")]
    pub reason: Option<String>,
    #[serde(default)]
    pub downtime_start: Option<String>,
    #[serde(default)]
    pub downtime_stop: Option<String>,
}

pub struct StationDailyApi {
    station_daily_repo: Arc<StationDailyRepository>,
    station_repo: Arc<StationRepository>,
}

impl StationDailyApi {
    pub fn new(
        station_daily_repo: Arc<StationDailyRepository>,
        station_repo: Arc<StationRepository>,
    ) -> Self {
        Self {
            station_daily_repo,
            station_repo,
        }
    }

    // ==========================================
    // 工位日状态
    // ==========================================

    pub fn list_daily_status(&self) -> ApiResult<Vec<StationDailyStatus>> {
        Ok(self.station_daily_repo.find_all()?)
    }

    pub fn get_daily_status(&self, id: &str) -> ApiResult<StationDailyStatus> {
        self.station_daily_repo
            .find_by_id(id)?
            .ok_or_else(|| ApiError::NotFound(format!("工位日状态{}不存在", id)))
    }

    pub fn list_daily_status_by_station(
        &self,
        station_id: &str,
    ) -> ApiResult<Vec<StationDailyStatus>> {
        Ok(self.station_daily_repo.find_by_station(station_id)?)
    }

    /// 新建工位日状态
    ///
    /// # 返回
    /// - Err(ApiError::NotFound): 工位不存在
    /// - Err(ApiError::Conflict): 该工位当日已有记录
    pub fn create_daily_status(
        &self,
        req: CreateStationDailyStatusRequest,
    ) -> ApiResult<StationDailyStatus> {
        let station_id = require_non_empty("工位ID", &req.station_id)?;
        let status_date = parse_date("日期", &req.status_date)?;
        self.ensure_station_exists(&station_id)?;

        if self
            .station_daily_repo
            .find_by_station_date(&station_id, status_date)?
            .is_some()
        {
            return Err(ApiError::Conflict(format!(
                "工位{}在{}已有日状态记录",
                station_id, status_date
            )));
        }

        let status = StationDailyStatus {
            id: Uuid::new_v4().to_string(),
            station_id,
            status_date,
            start_time: req
                .start_time
                .as_deref()
                .map(|t| parse_time("开工时刻", t))
                .transpose()?,
            stop_time: req
                .stop_time
                .as_deref()
                .map(|t| parse_time("收工时刻", t))
                .transpose()?,
            total_downtime: req
                .total_downtime
                .map(|m| require_quantity("累计停机分钟", m))
                .transpose()?,
        };

        self.station_daily_repo.insert(&status)?;
        info!(id = %status.id, station_id = %status.station_id, date = %status.status_date, "工位日状态已创建");
        Ok(status)
    }

    pub fn update_daily_status(
        &self,
        id: &str,
        req: UpdateStationDailyStatusRequest,
    ) -> ApiResult<StationDailyStatus> {
        let mut status = self.get_daily_status(id)?;

        if let Some(ref raw) = req.station_id {
            let station_id = require_non_empty("工位ID", raw)?;
            self.ensure_station_exists(&station_id)?;
            status.station_id = station_id;
        }
        if let Some(ref raw) = req.status_date {
            status.status_date = parse_date("日期", raw)?;
        }
        if let Some(ref raw) = req.start_time {
            status.start_time = Some(parse_time("开工时刻", raw)?);
        }
        if let Some(ref raw) = req.stop_time {
            status.stop_time = Some(parse_time("收工时刻", raw)?);
        }
        if let Some(minutes) = req.total_downtime {
            status.total_downtime = Some(require_quantity("累计停机分钟", minutes)?);
        }

        self.station_daily_repo.update(&status)?;
        info!(id = %id, "工位日状态已更新");
        Ok(status)
    }

    /// 删除工位日状态（停机记录级联删除）
    pub fn delete_daily_status(&self, id: &str) -> ApiResult<()> {
        if !self.station_daily_repo.delete(id)? {
            return Err(ApiError::NotFound(format!("工位日状态{}不存在", id)));
        }
        info!(id = %id, "工位日状态已删除");
        Ok(())
    }

    // ==========================================
    // 停机记录
    // ==========================================

    pub fn list_downtime_logs(&self) -> ApiResult<Vec<StationDowntimeLog>> {
        Ok(self.station_daily_repo.find_all_logs()?)
    }

    pub fn get_downtime_log(&self, id: &str) -> ApiResult<StationDowntimeLog> {
        self.station_daily_repo
            .find_log_by_id(id)?
            .ok_or_else(|| ApiError::NotFound(format!("停机记录{}不存在", id)))
    }

    pub fn list_downtime_logs_by_daily(
        &self,
        station_daily_id: &str,
    ) -> ApiResult<Vec<StationDowntimeLog>> {
        Ok(self.station_daily_repo.find_logs_by_daily(station_daily_id)?)
    }

    /// 新建停机记录
    ///
    /// # 返回
    /// - Err(ApiError::NotFound): 所属日状态不存在
    pub fn create_downtime_log(&self, req: CreateDowntimeLogRequest) -> ApiResult<StationDowntimeLog> {
        let station_daily_id = require_non_empty("日状态ID", &req.station_daily_id)?;
        self.get_daily_status(&station_daily_id)?;

        let log = StationDowntimeLog {
            id: Uuid::new_v4().to_string(),
            station_daily_id,
            reason: normalize_optional(req.reason),
            downtime_start: req
                .downtime_start
                .as_deref()
                .map(|t| parse_instant("停机开始", t))
                .transpose()?,
            downtime_stop: req
                .downtime_stop
                .as_deref()
                .map(|t| parse_instant("停机结束", t))
                .transpose()?,
        };
        ensure_ordered(&log)?;

        self.station_daily_repo.insert_log(&log)?;
        info!(id = %log.id, station_daily_id = %log.station_daily_id, "停机记录已创建");
        Ok(log)
    }

    pub fn update_downtime_log(
        &self,
        id: &str,
        req: UpdateDowntimeLogRequest,
    ) -> ApiResult<StationDowntimeLog> {
        let mut log = self.get_downtime_log(id)?;

        if let Some(reason) = req.reason {
            log.reason = normalize_optional(Some(reason));
        }
        if let Some(ref raw) = req.downtime_start {
            log.downtime_start = Some(parse_instant("停机开始", raw)?);
        }
        if let Some(ref raw) = req.downtime_stop {
            log.downtime_stop = Some(parse_instant("停机结束", raw)?);
        }
        ensure_ordered(&log)?;

        self.station_daily_repo.update_log(&log)?;
        info!(id = %id, "停机记录已更新");
        Ok(log)
    }

    pub fn delete_downtime_log(&self, id: &str) -> ApiResult<()> {
        if !self.station_daily_repo.delete_log(id)? {
            return Err(ApiError::NotFound(format!("停机记录{}不存在", id)));
        }
        info!(id = %id, "停机记录已删除");
        Ok(())
    }

    fn ensure_station_exists(&self, station_id: &str) -> ApiResult<()> {
        if self.station_repo.find_by_id(station_id)?.is_none() {
            return Err(ApiError::NotFound(format!("工位{}不存在", station_id)));
        }
        Ok(())
    }
}

/// 停机结束不得早于开始
fn ensure_ordered(log: &StationDowntimeLog) -> ApiResult<()> {
    if let (Some(start), Some(stop)) = (log.downtime_start, log.downtime_stop) {
        if stop < start {
            return Err(ApiError::InvalidInput("停机结束时间早于开始时间".to_string()));
        }
    }
    Ok(())
}

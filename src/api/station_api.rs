// ==========================================
// 整车产线生产跟踪系统 - 工位 API
// ==========================================
// 职责: 工位主数据维护 + 工位状态迁移记账
// 状态迁移规则见 engine::downtime
// ==========================================

use chrono::{DateTime, Local, NaiveDate, NaiveTime, Timelike, Utc};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::{normalize_optional, require_bounded, NAME_MAX_LEN};
use crate::domain::station::{Station, StationDailyStatus, StationDowntimeLog};
use crate::domain::types::StationStatusCode;
use crate::engine::downtime::StationStateEngine;
use crate::repository::station_daily_repo::StationDailyRepository;
use crate::repository::station_repo::StationRepository;

/// 新建工位请求
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStationRequest {
    pub station_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// 更新工位请求（未提供的字段保持不变）
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStationRequest {
    #[serde(default)]
    pub station_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// 工位状态变更请求
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStationStatusRequest {
    #[serde(rename = "currentStatusCode", alias = "statusCode", alias = "code")]
    pub status_code: String,
    #[serde(default, rename = "currentStatusBrief", alias = "brief")]
    pub brief: Option<String>,
}

pub struct StationApi {
    station_repo: Arc<StationRepository>,
    station_daily_repo: Arc<StationDailyRepository>,
    state_engine: StationStateEngine,
}

impl StationApi {
    pub fn new(
        station_repo: Arc<StationRepository>,
        station_daily_repo: Arc<StationDailyRepository>,
    ) -> Self {
        Self {
            station_repo,
            station_daily_repo,
            state_engine: StationStateEngine::new(),
        }
    }

    // ==========================================
    // 查询接口
    // ==========================================

    pub fn list_stations(&self) -> ApiResult<Vec<Station>> {
        Ok(self.station_repo.find_all()?)
    }

    pub fn list_active_stations(&self) -> ApiResult<Vec<Station>> {
        Ok(self.station_repo.find_active()?)
    }

    pub fn get_station(&self, id: &str) -> ApiResult<Station> {
        self.station_repo
            .find_by_id(id)?
            .ok_or_else(|| ApiError::NotFound(format!("工位{}不存在", id)))
    }

    // ==========================================
    // 主数据维护
    // ==========================================

    pub fn create_station(&self, req: CreateStationRequest) -> ApiResult<Station> {
        let station = Station {
            id: Uuid::new_v4().to_string(),
            station_name: require_bounded("工位名称", &req.station_name, NAME_MAX_LEN)?,
            description: normalize_optional(req.description),
            is_active: req.is_active.unwrap_or(true),
            current_status_code: StationStatusCode::Idle,
            current_status_brief: None,
        };

        self.station_repo.insert(&station)?;
        info!(station_id = %station.id, station_name = %station.station_name, "工位已创建");
        Ok(station)
    }

    pub fn update_station(&self, id: &str, req: UpdateStationRequest) -> ApiResult<Station> {
        let mut station = self.get_station(id)?;

        if let Some(ref name) = req.station_name {
            station.station_name = require_bounded("工位名称", name, NAME_MAX_LEN)?;
        }
        if let Some(description) = req.description {
            station.description = normalize_optional(Some(description));
        }
        if let Some(is_active) = req.is_active {
            station.is_active = is_active;
        }

        self.station_repo.update(&station)?;
        info!(station_id = %id, "工位已更新");
        Ok(station)
    }

    /// 删除工位
    ///
    /// # 返回
    /// - Err(ApiError::Conflict): 仍有日状态记录引用该工位
    pub fn delete_station(&self, id: &str) -> ApiResult<()> {
        self.get_station(id)?;

        let refs = self.station_repo.count_daily_status_refs(id)?;
        if refs > 0 {
            return Err(ApiError::Conflict(format!(
                "工位{}仍被{}条日状态记录引用，不能删除",
                id, refs
            )));
        }

        self.station_repo.delete(id)?;
        info!(station_id = %id, "工位已删除");
        Ok(())
    }

    // ==========================================
    // 状态迁移
    // ==========================================

    /// 变更工位状态（以当前本地时间记账）
    pub fn update_status(&self, id: &str, req: UpdateStationStatusRequest) -> ApiResult<Station> {
        self.update_status_at(id, req, Local::now())
    }

    /// 变更工位状态（指定记账时刻）
    ///
    /// # 记账
    /// - RUNNING → STOP/EMERGENCY: 在当日日状态下开启停机记录（原因取 brief）
    /// - STOP/EMERGENCY → RUNNING/IDLE: 关闭该工位最近一条未结束停机记录，
    ///   整分钟时长累加到该记录所属日状态的 total_downtime
    /// - → RUNNING / → IDLE: 当日开工/收工时刻未设置时补记
    pub fn update_status_at(
        &self,
        id: &str,
        req: UpdateStationStatusRequest,
        now: DateTime<Local>,
    ) -> ApiResult<Station> {
        let code = StationStatusCode::parse(&req.status_code).ok_or_else(|| {
            ApiError::InvalidInput(format!(
                "工位状态无效: {}（应为IDLE/RUNNING/STOP/EMERGENCY）",
                req.status_code
            ))
        })?;
        let brief = normalize_optional(req.brief);

        let station = self.get_station(id)?;
        let from = station.current_status_code;
        let effects = self.state_engine.plan_transition(from, code);
        let instant = now.with_timezone(&Utc);

        debug!(station_id = %id, from = %from, to = %code, ?effects, "工位状态迁移");

        if effects.touches_daily_status() {
            let mut daily = self.ensure_daily_status(id, now.date_naive())?;
            let clock = wall_clock(now);
            let mut changed = false;

            if effects.mark_day_start && daily.start_time.is_none() {
                daily.start_time = Some(clock);
                changed = true;
            }
            if effects.mark_day_stop && daily.stop_time.is_none() {
                daily.stop_time = Some(clock);
                changed = true;
            }
            if changed {
                self.station_daily_repo.update(&daily)?;
            }

            if effects.open_downtime {
                let log = StationDowntimeLog {
                    id: Uuid::new_v4().to_string(),
                    station_daily_id: daily.id.clone(),
                    reason: brief.clone(),
                    downtime_start: Some(instant),
                    downtime_stop: None,
                };
                self.station_daily_repo.insert_log(&log)?;
                info!(station_id = %id, log_id = %log.id, "停机记录已开启");
            }
        }

        if effects.close_downtime {
            match self.station_daily_repo.find_latest_open_log_for_station(id)? {
                Some(log) => {
                    let minutes = log
                        .downtime_start
                        .map(|start| (instant - start).num_minutes().max(0))
                        .unwrap_or(0);
                    self.station_daily_repo.close_log_and_accumulate(
                        &log.id,
                        &log.station_daily_id,
                        instant,
                        minutes,
                    )?;
                    info!(station_id = %id, log_id = %log.id, minutes, "停机记录已结束");
                }
                None => {
                    warn!(station_id = %id, to = %code, "结束停机时未找到未结束的停机记录");
                }
            }
        }

        self.station_repo.update_status(id, code, brief.as_deref())?;
        info!(station_id = %id, from = %from, to = %code, "工位状态已变更");

        self.get_station(id)
    }

    /// 取当日日状态，不存在时创建
    fn ensure_daily_status(
        &self,
        station_id: &str,
        date: NaiveDate,
    ) -> ApiResult<StationDailyStatus> {
        if let Some(existing) = self
            .station_daily_repo
            .find_by_station_date(station_id, date)?
        {
            return Ok(existing);
        }

        let daily = StationDailyStatus {
            id: Uuid::new_v4().to_string(),
            station_id: station_id.to_string(),
            status_date: date,
            start_time: None,
            stop_time: None,
            total_downtime: None,
        };
        self.station_daily_repo.insert(&daily)?;
        debug!(station_id = %station_id, date = %date, "已创建当日日状态");
        Ok(daily)
    }
}

/// 本地时刻（精确到秒）
fn wall_clock(now: DateTime<Local>) -> NaiveTime {
    let t = now.time();
    t.with_nanosecond(0).unwrap_or(t)
}

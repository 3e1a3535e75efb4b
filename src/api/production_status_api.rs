// ==========================================
// 整车产线生产跟踪系统 - 车辆生产状态 API
// ==========================================
// 职责:
// - 车辆生产记录维护（vehicleID 唯一）
// - 工位时间线推进（同一时刻最多一条未结束记录）
// - 质检登记与日/月实绩计数
// 计数规则:
// - 仅在车辆首次获得质检结果时 +1（OK→NG 改判不重复计数）
// - 清除质检结果、删除已质检车辆时 -1（下限 0）
// - 计数失败只记录告警，不影响主操作
// ==========================================

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::{
    normalize_optional, parse_date, parse_instant, require_bounded, require_non_empty,
    MODEL_ID_MAX_LEN,
};
use crate::domain::production::{ProductionStatus, VehicleTimeline};
use crate::domain::types::Quality;
use crate::repository::plan_repo::ProductionPlanRepository;
use crate::repository::production_status_repo::ProductionStatusRepository;
use crate::repository::station_repo::StationRepository;

/// 新建车辆生产记录请求
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProductionStatusRequest {
    #[serde(rename = "modelID", alias = "modelId")]
    pub model_id: String,
    #[serde(rename = "vehicleID", alias = "vehicleId")]
    pub vehicle_id: String,
    #[serde(rename = "productionDate")]
    pub production_date: String,
    #[serde(default)]
    pub remark: Option<String>,
}

/// 更新车辆生产记录请求（未提供的字段保持不变）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProductionStatusRequest {
    #[serde(default, rename = "modelID", alias = "modelId")]
    pub model_id: Option<String>,
    #[serde(default, rename = "vehicleID", alias = "vehicleId")]
    pub vehicle_id: Option<String>,
    #[serde(default, rename = "productionDate")]
    pub production_date: Option<String>,
    #[serde(default)]
    pub remark: Option<String>,
}

/// 进站请求
#[derive(Debug, Clone, Deserialize)]
pub struct AddStationRequest {
    #[serde(rename = "stationID", alias = "stationId")]
    pub station_id: String,
    #[serde(default, rename = "stationName")]
    pub station_name: Option<String>,
    /// RFC 3339；缺省为当前时间
    #[serde(default, rename = "startTime")]
    pub start_time: Option<String>,
}

/// 质检登记请求
#[derive(Debug, Clone, Deserialize)]
pub struct RecordQualityRequest {
    pub quality: String,
    #[serde(default)]
    pub remark: Option<String>,
}

pub struct ProductionStatusApi {
    status_repo: Arc<ProductionStatusRepository>,
    plan_repo: Arc<ProductionPlanRepository>,
    station_repo: Arc<StationRepository>,
}

impl ProductionStatusApi {
    pub fn new(
        status_repo: Arc<ProductionStatusRepository>,
        plan_repo: Arc<ProductionPlanRepository>,
        station_repo: Arc<StationRepository>,
    ) -> Self {
        Self {
            status_repo,
            plan_repo,
            station_repo,
        }
    }

    // ==========================================
    // 查询接口
    // ==========================================

    pub fn list(&self) -> ApiResult<Vec<ProductionStatus>> {
        Ok(self.status_repo.find_all()?)
    }

    pub fn get(&self, id: &str) -> ApiResult<ProductionStatus> {
        self.status_repo
            .find_by_id(id)?
            .ok_or_else(|| ApiError::NotFound(format!("生产记录{}不存在", id)))
    }

    // ==========================================
    // 记录维护
    // ==========================================

    /// 新建车辆生产记录（时间线为空，未质检）
    pub fn create(&self, req: CreateProductionStatusRequest) -> ApiResult<ProductionStatus> {
        let vehicle_id = require_non_empty("车辆编号", &req.vehicle_id)?;
        self.ensure_vehicle_id_free(&vehicle_id)?;

        let status = ProductionStatus {
            id: Uuid::new_v4().to_string(),
            model_id: require_bounded("车型", &req.model_id, MODEL_ID_MAX_LEN)?,
            vehicle_id,
            production_date: parse_date("生产日期", &req.production_date)?,
            station_timeline: Vec::new(),
            quality: None,
            remark: normalize_optional(req.remark),
        };

        self.status_repo.insert(&status)?;
        info!(id = %status.id, vehicle_id = %status.vehicle_id, model = %status.model_id, "生产记录已创建");
        Ok(status)
    }

    /// 更新车辆生产记录
    ///
    /// 已质检车辆的车型或生产日期变化时，实绩计数随之迁移
    pub fn update(
        &self,
        id: &str,
        req: UpdateProductionStatusRequest,
    ) -> ApiResult<ProductionStatus> {
        let mut status = self.get(id)?;
        let old_key = (status.model_id.clone(), status.production_date);

        if let Some(ref raw) = req.vehicle_id {
            let vehicle_id = require_non_empty("车辆编号", raw)?;
            if vehicle_id != status.vehicle_id {
                self.ensure_vehicle_id_free(&vehicle_id)?;
                status.vehicle_id = vehicle_id;
            }
        }
        if let Some(ref raw) = req.model_id {
            status.model_id = require_bounded("车型", raw, MODEL_ID_MAX_LEN)?;
        }
        if let Some(ref raw) = req.production_date {
            status.production_date = parse_date("生产日期", raw)?;
        }
        if let Some(remark) = req.remark {
            status.remark = normalize_optional(Some(remark));
        }

        self.status_repo.update(&status)?;

        let new_key = (status.model_id.clone(), status.production_date);
        if status.quality.is_some() && old_key != new_key {
            self.adjust_counters_best_effort(&old_key.0, old_key.1, -1);
            self.adjust_counters_best_effort(&new_key.0, new_key.1, 1);
        }

        info!(id = %id, vehicle_id = %status.vehicle_id, "生产记录已更新");
        Ok(status)
    }

    /// 删除车辆生产记录（已质检时先回退计数）
    pub fn remove(&self, id: &str) -> ApiResult<()> {
        let status = self.get(id)?;

        if status.quality.is_some() {
            self.adjust_counters_best_effort(&status.model_id, status.production_date, -1);
        }

        self.status_repo.delete(id)?;
        info!(id = %id, vehicle_id = %status.vehicle_id, "生产记录已删除");
        Ok(())
    }

    // ==========================================
    // 工位时间线
    // ==========================================

    /// 车辆进入工位
    ///
    /// - 上一条记录未结束时，以本次进站时间结束它
    /// - 进站时间早于当前工位进站时间时拒绝
    pub fn add_station(&self, id: &str, req: AddStationRequest) -> ApiResult<ProductionStatus> {
        let start_time = match req.start_time {
            Some(ref raw) => parse_instant("进站时间", raw)?,
            None => Utc::now(),
        };
        let station_id = require_non_empty("工位ID", &req.station_id)?;

        let mut status = self.get(id)?;
        if !status.accepts_start(start_time) {
            return Err(ApiError::InvalidInput(format!(
                "进站时间{}早于当前工位的进站时间",
                start_time.to_rfc3339()
            )));
        }

        let station_name = match normalize_optional(req.station_name) {
            Some(name) => Some(name),
            None => self
                .station_repo
                .find_by_id(&station_id)?
                .map(|s| s.station_name),
        };

        status.enter_station(station_id.clone(), station_name, start_time);
        self.status_repo.update(&status)?;

        debug!(id = %id, station_id = %station_id, entries = status.station_timeline.len(), "车辆进站");
        Ok(status)
    }

    // ==========================================
    // 质检
    // ==========================================

    pub fn record_quality(&self, id: &str, req: RecordQualityRequest) -> ApiResult<ProductionStatus> {
        self.record_quality_at(id, req, Utc::now())
    }

    /// 登记质检结果（指定登记时刻）
    ///
    /// - 结束当前工位记录
    /// - 首次质检时当日日计划 actual_day +1，所属月计划 cumulative +1
    pub fn record_quality_at(
        &self,
        id: &str,
        req: RecordQualityRequest,
        at: DateTime<Utc>,
    ) -> ApiResult<ProductionStatus> {
        let quality = Quality::parse(&req.quality).ok_or_else(|| {
            ApiError::InvalidInput(format!("质检结果无效: {}（应为OK/NG）", req.quality))
        })?;

        let mut status = self.get(id)?;
        let first_grading = status.quality.is_none();

        status.close_open_entry(at);
        status.quality = Some(quality);
        if let Some(remark) = normalize_optional(req.remark) {
            status.remark = Some(remark);
        }

        self.status_repo.update(&status)?;

        if first_grading {
            self.adjust_counters_best_effort(&status.model_id, status.production_date, 1);
        }

        info!(id = %id, vehicle_id = %status.vehicle_id, quality = %quality, first_grading, "质检结果已登记");
        Ok(status)
    }

    /// 清除质检结果并回退计数
    pub fn clear_quality(&self, id: &str) -> ApiResult<ProductionStatus> {
        let mut status = self.get(id)?;
        if status.quality.is_none() {
            return Ok(status);
        }

        status.quality = None;
        self.status_repo.update(&status)?;
        self.adjust_counters_best_effort(&status.model_id, status.production_date, -1);

        info!(id = %id, vehicle_id = %status.vehicle_id, "质检结果已清除");
        Ok(status)
    }

    // ==========================================
    // 内部辅助
    // ==========================================

    fn ensure_vehicle_id_free(&self, vehicle_id: &str) -> ApiResult<()> {
        if self.status_repo.find_by_vehicle_id(vehicle_id)?.is_some() {
            return Err(ApiError::Conflict(format!("车辆编号{}已存在", vehicle_id)));
        }
        Ok(())
    }

    /// 调整日/月实绩计数；失败只告警
    fn adjust_counters_best_effort(&self, model: &str, date: NaiveDate, delta: i64) {
        match self
            .plan_repo
            .adjust_actual_counters(model, date, delta, Utc::now())
        {
            Ok(true) => debug!(model = %model, date = %date, delta, "实绩计数已调整"),
            Ok(false) => debug!(model = %model, date = %date, "无对应日计划，跳过计数"),
            Err(e) => warn!(model = %model, date = %date, delta, error = %e, "实绩计数调整失败"),
        }
    }
}

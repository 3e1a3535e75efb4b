// ==========================================
// API集成测试辅助工具
// ==========================================
// 职责: 提供API层集成测试的通用辅助函数
// ==========================================

#[path = "../test_helpers.rs"]
mod test_helpers;

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;

use assembly_line_tracker::api::plan_api::{UpsertDailyPlanRequest, UpsertMonthPlanRequest};
use assembly_line_tracker::api::production_status_api::{
    AddStationRequest, CreateProductionStatusRequest, RecordQualityRequest,
};
use assembly_line_tracker::api::station_api::CreateStationRequest;
use assembly_line_tracker::api::{
    ConfigApi, ModelApi, PlanApi, ProductionStatusApi, StationApi, StationDailyApi,
};
use assembly_line_tracker::config::config_manager::ConfigManager;
use assembly_line_tracker::domain::{DailyPlan, MonthPlan, ProductionStatus, Station};
use assembly_line_tracker::repository::{
    ProductionPlanRepository, ProductionStatusRepository, StationDailyRepository,
    StationRepository, VehicleModelRepository,
};

// ==========================================
// API测试环境
// ==========================================

/// API测试环境
///
/// 包含所有API实例和必要的依赖
pub struct ApiTestEnv {
    pub db_path: String,
    pub model_api: Arc<ModelApi>,
    pub station_api: Arc<StationApi>,
    pub plan_api: Arc<PlanApi>,
    pub production_status_api: Arc<ProductionStatusApi>,
    pub station_daily_api: Arc<StationDailyApi>,
    pub config_api: Arc<ConfigApi>,

    // Repository层（用于测试数据准备与校验）
    pub model_repo: Arc<VehicleModelRepository>,
    pub plan_repo: Arc<ProductionPlanRepository>,
    pub production_status_repo: Arc<ProductionStatusRepository>,
    pub station_repo: Arc<StationRepository>,
    pub station_daily_repo: Arc<StationDailyRepository>,
    pub config_manager: Arc<ConfigManager>,

    // 临时文件（确保生命周期）
    _temp_file: NamedTempFile,
}

impl ApiTestEnv {
    /// 创建新的API测试环境
    ///
    /// # 说明
    /// - 使用临时数据库文件
    /// - 初始化所有Repository和API（共享同一连接）
    pub fn new() -> Result<Self, String> {
        assembly_line_tracker::logging::init_test();

        let (temp_file, db_path) = test_helpers::create_test_db()
            .map_err(|e| format!("创建测试数据库失败: {}", e))?;

        let conn: Connection = test_helpers::open_test_connection(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        let model_repo = Arc::new(VehicleModelRepository::new(conn.clone()));
        let plan_repo = Arc::new(ProductionPlanRepository::new(conn.clone()));
        let production_status_repo = Arc::new(ProductionStatusRepository::new(conn.clone()));
        let station_repo = Arc::new(StationRepository::new(conn.clone()));
        let station_daily_repo = Arc::new(StationDailyRepository::new(conn.clone()));
        let config_manager = Arc::new(
            ConfigManager::from_connection(conn)
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );

        let model_api = Arc::new(ModelApi::new(model_repo.clone()));
        let station_api = Arc::new(StationApi::new(
            station_repo.clone(),
            station_daily_repo.clone(),
        ));
        let plan_api = Arc::new(PlanApi::new(plan_repo.clone(), config_manager.clone()));
        let production_status_api = Arc::new(ProductionStatusApi::new(
            production_status_repo.clone(),
            plan_repo.clone(),
            station_repo.clone(),
        ));
        let station_daily_api = Arc::new(StationDailyApi::new(
            station_daily_repo.clone(),
            station_repo.clone(),
        ));
        let config_api = Arc::new(ConfigApi::new(config_manager.clone()));

        Ok(Self {
            db_path,
            model_api,
            station_api,
            plan_api,
            production_status_api,
            station_daily_api,
            config_api,
            model_repo,
            plan_repo,
            production_status_repo,
            station_repo,
            station_daily_repo,
            config_manager,
            _temp_file: temp_file,
        })
    }

    // ==========================================
    // 测试数据准备
    // ==========================================

    pub fn seed_month_plan(&self, model: &str, month: &str, planned_month: i64) -> MonthPlan {
        self.plan_api
            .upsert_month_plan(UpsertMonthPlanRequest {
                model: model.to_string(),
                month: month.to_string(),
                planned_month,
            })
            .expect("创建月计划失败")
    }

    pub fn seed_daily_plan(
        &self,
        model: &str,
        date: &str,
        planned_day: i64,
        actual_day: Option<i64>,
    ) -> DailyPlan {
        self.plan_api
            .upsert_daily_plan(UpsertDailyPlanRequest {
                model: model.to_string(),
                date: date.to_string(),
                planned_day,
                actual_day,
            })
            .expect("创建日计划失败")
    }

    pub fn seed_vehicle(&self, model: &str, vehicle_id: &str, date: &str) -> ProductionStatus {
        self.production_status_api
            .create(CreateProductionStatusRequest {
                model_id: model.to_string(),
                vehicle_id: vehicle_id.to_string(),
                production_date: date.to_string(),
                remark: None,
            })
            .expect("创建生产记录失败")
    }

    pub fn seed_station(&self, name: &str) -> Station {
        self.station_api
            .create_station(CreateStationRequest {
                station_name: name.to_string(),
                description: None,
                is_active: None,
            })
            .expect("创建工位失败")
    }

    pub fn enter_station(&self, id: &str, station_id: &str, start_time: &str) -> ProductionStatus {
        self.production_status_api
            .add_station(
                id,
                AddStationRequest {
                    station_id: station_id.to_string(),
                    station_name: None,
                    start_time: Some(start_time.to_string()),
                },
            )
            .expect("进站失败")
    }

    pub fn grade(&self, id: &str, quality: &str, at: DateTime<Utc>) -> ProductionStatus {
        self.production_status_api
            .record_quality_at(
                id,
                RecordQualityRequest {
                    quality: quality.to_string(),
                    remark: None,
                },
                at,
            )
            .expect("质检登记失败")
    }

    /// 当前日计划实绩（不存在时返回 None）
    pub fn actual_day(&self, model: &str, date: &str) -> Option<i64> {
        let date = chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").expect("日期格式错误");
        self.plan_repo
            .find_daily_plan(model, date)
            .expect("查询日计划失败")
            .map(|p| p.actual_day)
    }

    /// 当前月计划累计（不存在时返回 None）
    pub fn month_cumulative(&self, model: &str, month_first_day: &str) -> Option<i64> {
        let date =
            chrono::NaiveDate::parse_from_str(month_first_day, "%Y-%m-%d").expect("日期格式错误");
        self.plan_repo
            .find_month_plan(model, date)
            .expect("查询月计划失败")
            .map(|p| p.cumulative)
    }
}

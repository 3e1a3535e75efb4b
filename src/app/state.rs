// ==========================================
// 整车产线生产跟踪系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use rusqlite::Connection;
use std::sync::{Arc, Mutex};

use crate::api::{
    ConfigApi, ModelApi, PlanApi, ProductionStatusApi, StationApi, StationDailyApi,
};
use crate::config::config_manager::ConfigManager;
use crate::db::{ensure_schema, open_sqlite_connection, read_schema_version};
use crate::repository::{
    ProductionPlanRepository, ProductionStatusRepository, StationDailyRepository,
    StationRepository, VehicleModelRepository,
};

/// 应用状态
///
/// 包含所有API实例和共享资源，作为 axum Router 的共享状态
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 车型API
    pub model_api: Arc<ModelApi>,

    /// 工位API
    pub station_api: Arc<StationApi>,

    /// 生产计划API
    pub plan_api: Arc<PlanApi>,

    /// 车辆生产状态API
    pub production_status_api: Arc<ProductionStatusApi>,

    /// 工位日状态 / 停机记录API
    pub station_daily_api: Arc<StationDailyApi>,

    /// 配置管理API
    pub config_api: Arc<ConfigApi>,

    /// 配置管理器（看板轮询间隔等）
    pub config_manager: Arc<ConfigManager>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 打开数据库并确保表结构
    /// 2. 初始化所有Repository（共享同一连接）
    /// 3. 创建所有API实例
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_sqlite_connection(&db_path).map_err(|e| format!("无法打开数据库: {}", e))?;
        ensure_schema(&conn).map_err(|e| format!("数据库表结构初始化失败: {}", e))?;
        match read_schema_version(&conn) {
            Ok(version) => tracing::info!("数据库 schema_version={:?}", version),
            Err(e) => tracing::warn!("读取 schema_version 失败: {}", e),
        }

        Self::from_connection(db_path, Arc::new(Mutex::new(conn)))
    }

    /// 基于已打开的连接构建（连接须已完成 ensure_schema）
    pub fn from_connection(db_path: String, conn: Arc<Mutex<Connection>>) -> Result<Self, String> {
        // ==========================================
        // 初始化Repository层
        // ==========================================
        let model_repo = Arc::new(VehicleModelRepository::new(conn.clone()));
        let plan_repo = Arc::new(ProductionPlanRepository::new(conn.clone()));
        let production_status_repo = Arc::new(ProductionStatusRepository::new(conn.clone()));
        let station_repo = Arc::new(StationRepository::new(conn.clone()));
        let station_daily_repo = Arc::new(StationDailyRepository::new(conn.clone()));

        let config_manager = Arc::new(
            ConfigManager::from_connection(conn)
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );

        // ==========================================
        // 初始化API层
        // ==========================================
        let model_api = Arc::new(ModelApi::new(model_repo));
        let station_api = Arc::new(StationApi::new(
            station_repo.clone(),
            station_daily_repo.clone(),
        ));
        let plan_api = Arc::new(PlanApi::new(plan_repo.clone(), config_manager.clone()));
        let production_status_api = Arc::new(ProductionStatusApi::new(
            production_status_repo,
            plan_repo,
            station_repo.clone(),
        ));
        let station_daily_api = Arc::new(StationDailyApi::new(station_daily_repo, station_repo));
        let config_api = Arc::new(ConfigApi::new(config_manager.clone()));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            model_api,
            station_api,
            plan_api,
            production_status_api,
            station_daily_api,
            config_api,
            config_manager,
        })
    }
}

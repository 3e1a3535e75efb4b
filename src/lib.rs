// ==========================================
// 整车产线生产跟踪系统 - 核心库
// ==========================================
// 技术栈: axum + Rust + SQLite
// 系统定位: 产线看板后端（计划 / 车辆进度 / 工位状态）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 记账规则
pub mod engine;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA/表结构）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - HTTP 集成
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{Quality, StationStatusCode};

// 领域实体
pub use domain::{
    DailyPlan, DailySummary, MonthPlan, ProductionStatus, Station, StationDailyStatus,
    StationDowntimeLog, TimelineEntry, VehicleModel,
};

// 引擎
pub use engine::{StationStateEngine, SummaryCalculator};

// API
pub use api::{
    ConfigApi, ModelApi, PlanApi, ProductionStatusApi, StationApi, StationDailyApi,
};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "整车产线生产跟踪系统";

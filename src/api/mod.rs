// ==========================================
// 整车产线生产跟踪系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口,供 HTTP 路由调用
// 同步接口，由 app::state 在阻塞线程池中执行
// ==========================================

pub mod config_api;
pub mod error;
pub mod model_api;
pub mod plan_api;
pub mod production_status_api;
pub mod station_api;
pub mod station_daily_api;
pub mod validator;

// 重导出核心类型
pub use config_api::ConfigApi;
pub use error::{ApiError, ApiResult};
pub use model_api::ModelApi;
pub use plan_api::PlanApi;
pub use production_status_api::ProductionStatusApi;
pub use station_api::StationApi;
pub use station_daily_api::StationDailyApi;

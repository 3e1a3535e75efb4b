// ==========================================
// 整车产线生产跟踪系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// 约束: 所有仓储共享同一个 Arc<Mutex<Connection>>
// ==========================================

pub mod error;
pub mod model_repo;
pub mod plan_repo;
pub mod production_status_repo;
pub mod row_utils;
pub mod station_daily_repo;
pub mod station_repo;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use model_repo::VehicleModelRepository;
pub use plan_repo::ProductionPlanRepository;
pub use production_status_repo::ProductionStatusRepository;
pub use station_daily_repo::StationDailyRepository;
pub use station_repo::StationRepository;

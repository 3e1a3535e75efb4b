// ==========================================
// 整车产线生产跟踪系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、时间线推进规则
// 红线: 不含数据访问逻辑
// ==========================================

pub mod model;
pub mod plan;
pub mod production;
pub mod station;
pub mod types;

// 重导出核心类型
pub use model::VehicleModel;
pub use plan::{month_start, DailyPlan, DailySummary, MonthPlan, SummaryRow, SummaryTotal};
pub use production::{ProductionStatus, TimelineEntry, VehicleTimeline};
pub use station::{Station, StationDailyStatus, StationDowntimeLog};
pub use types::{Quality, StationStatusCode};

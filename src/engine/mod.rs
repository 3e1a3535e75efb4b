// ==========================================
// 整车产线生产跟踪系统 - 引擎层
// ==========================================
// 职责: 实现记账规则,不拼 SQL
// 红线: Engine 不访问数据库, 输入输出均为领域对象
// ==========================================

pub mod downtime;
pub mod summary;

// 重导出核心引擎
pub use downtime::{StationStateEngine, TransitionEffects};
pub use summary::SummaryCalculator;

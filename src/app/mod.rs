// ==========================================
// 整车产线生产跟踪系统 - 应用层
// ==========================================
// 职责: HTTP 集成,连接看板与后端
// ==========================================

pub mod routes;
pub mod server;
pub mod state;

// 重导出
pub use server::{build_router, start_server};
pub use state::AppState;

// ==========================================
// 整车产线生产跟踪系统 - 车型领域模型
// ==========================================

use serde::{Deserialize, Serialize};

/// 车型 (SKU)
///
/// 对齐: models 表，model_id 为自然主键（如 "KL199"）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleModel {
    pub model_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

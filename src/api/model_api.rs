// ==========================================
// 整车产线生产跟踪系统 - 车型 API
// ==========================================
// 职责: 车型主数据维护
// 说明: 删除车型会级联删除其月/日计划；改名会同步计划与生产记录
// ==========================================

use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::{normalize_optional, require_bounded, MODEL_ID_MAX_LEN, NAME_MAX_LEN};
use crate::domain::model::VehicleModel;
use crate::repository::model_repo::VehicleModelRepository;

/// 新建车型请求
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateModelRequest {
    pub model_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// 更新车型请求（未提供的字段保持不变）
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateModelRequest {
    #[serde(default)]
    pub model_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

pub struct ModelApi {
    model_repo: Arc<VehicleModelRepository>,
}

impl ModelApi {
    pub fn new(model_repo: Arc<VehicleModelRepository>) -> Self {
        Self { model_repo }
    }

    pub fn list_models(&self) -> ApiResult<Vec<VehicleModel>> {
        Ok(self.model_repo.find_all()?)
    }

    pub fn get_model(&self, model_id: &str) -> ApiResult<VehicleModel> {
        self.model_repo
            .find_by_id(model_id)?
            .ok_or_else(|| ApiError::NotFound(format!("车型{}不存在", model_id)))
    }

    /// 新建车型
    ///
    /// # 返回
    /// - Err(ApiError::Conflict): model_id 已存在
    pub fn create_model(&self, req: CreateModelRequest) -> ApiResult<VehicleModel> {
        let model = VehicleModel {
            model_id: require_bounded("车型ID", &req.model_id, MODEL_ID_MAX_LEN)?,
            name: require_bounded("车型名称", &req.name, NAME_MAX_LEN)?,
            description: normalize_optional(req.description),
        };

        if self.model_repo.find_by_id(&model.model_id)?.is_some() {
            return Err(ApiError::Conflict(format!("车型{}已存在", model.model_id)));
        }

        self.model_repo.insert(&model)?;
        info!(model_id = %model.model_id, "车型已创建");
        Ok(model)
    }

    /// 更新车型
    ///
    /// 改名到已存在的 model_id 返回 Conflict
    pub fn update_model(&self, model_id: &str, req: UpdateModelRequest) -> ApiResult<VehicleModel> {
        let current = self.get_model(model_id)?;

        let next_id = match req.model_id {
            Some(ref raw) => require_bounded("车型ID", raw, MODEL_ID_MAX_LEN)?,
            None => current.model_id.clone(),
        };
        let next_name = match req.name {
            Some(ref raw) => require_bounded("车型名称", raw, NAME_MAX_LEN)?,
            None => current.name.clone(),
        };
        let next_description = match req.description {
            Some(raw) => normalize_optional(Some(raw)),
            None => current.description.clone(),
        };

        if next_id != current.model_id && self.model_repo.find_by_id(&next_id)?.is_some() {
            return Err(ApiError::Conflict(format!("车型{}已存在", next_id)));
        }

        let updated = VehicleModel {
            model_id: next_id,
            name: next_name,
            description: next_description,
        };
        self.model_repo.update(&current.model_id, &updated)?;

        info!(from = %current.model_id, to = %updated.model_id, "车型已更新");
        Ok(updated)
    }

    /// 删除车型（级联删除计划）
    pub fn delete_model(&self, model_id: &str) -> ApiResult<()> {
        if !self.model_repo.delete_cascade_plans(model_id)? {
            return Err(ApiError::NotFound(format!("车型{}不存在", model_id)));
        }
        info!(model_id = %model_id, "车型已删除（含计划）");
        Ok(())
    }
}

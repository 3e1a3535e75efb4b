// ==========================================
// 整车产线生产跟踪系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，转换Repository错误为用户友好的错误消息
// HTTP 映射见 app::routes::common
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 业务规则错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    /// 自然键重复、被引用记录的删除
    #[error("冲突: {0}")]
    Conflict(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),
}

impl ApiError {
    /// 机器可读的错误码（响应体 code 字段）
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidInput(_) => "INVALID_INPUT",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::DatabaseError(_) => "DATABASE_ERROR",
            ApiError::DatabaseConnectionError(_) => "DATABASE_CONNECTION_ERROR",
            ApiError::InternalError(_) => "INTERNAL_ERROR",
        }
    }
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::Conflict(format!("唯一约束违反: {}", msg))
            }
            RepositoryError::ForeignKeyViolation(msg) => {
                ApiError::Conflict(format!("外键约束违反: {}", msg))
            }
            RepositoryError::FieldValueError { field, message } => {
                ApiError::DatabaseError(format!("字段{}错误: {}", field, message))
            }
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_conversion() {
        let err: ApiError = RepositoryError::NotFound {
            entity: "Station".to_string(),
            id: "S1".to_string(),
        }
        .into();
        assert!(matches!(err, ApiError::NotFound(ref m) if m.contains("S1")));
        assert_eq!(err.code(), "NOT_FOUND");
    }

    #[test]
    fn test_constraint_violations_become_conflict() {
        let unique: ApiError =
            RepositoryError::UniqueConstraintViolation("models.model_id".to_string()).into();
        let fk: ApiError =
            RepositoryError::ForeignKeyViolation("FOREIGN KEY constraint failed".to_string()).into();
        assert!(matches!(unique, ApiError::Conflict(_)));
        assert!(matches!(fk, ApiError::Conflict(_)));
    }

    #[test]
    fn test_lock_error_is_connection_error() {
        let err: ApiError = RepositoryError::LockError("poisoned".to_string()).into();
        assert!(matches!(err, ApiError::DatabaseConnectionError(ref m) if m.contains("poisoned")));
    }
}

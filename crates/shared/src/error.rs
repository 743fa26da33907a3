//! 统一错误处理模块
//!
//! 定义系统中所有共享的错误类型，使用 thiserror 提供良好的错误信息。

use thiserror::Error;

/// 系统错误类型
#[derive(Debug, Error)]
pub enum GameError {
    // ==================== 数据库错误 ====================
    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),

    #[error("数据库迁移失败: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("记录已存在: {entity} {field}={value}")]
    AlreadyExists {
        entity: String,
        field: String,
        value: String,
    },

    #[error("并发修改冲突: {entity} id={id}, 期望版本 {expected_version}")]
    ConcurrencyConflict {
        entity: String,
        id: String,
        expected_version: i64,
    },

    // ==================== 档案结构错误 ====================
    #[error("档案结构版本不匹配: 期望 {expected}, 实际 {actual}")]
    SchemaMismatch { expected: String, actual: String },

    // ==================== 通用错误 ====================
    #[error("内部错误: {0}")]
    Internal(String),
}

/// 错误结果类型别名
pub type Result<T> = std::result::Result<T, GameError>;

impl GameError {
    /// 是否为可重试错误
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Database(_) | Self::ConcurrencyConflict { .. })
    }

    /// 将 sqlx 错误归类：唯一索引冲突转换为 `AlreadyExists`，其余保持数据库错误
    pub fn from_insert(err: sqlx::Error, entity: &str, field: &str, value: &str) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return Self::AlreadyExists {
                    entity: entity.to_string(),
                    field: field.to_string(),
                    value: value.to_string(),
                };
            }
        }
        Self::Database(err)
    }
}

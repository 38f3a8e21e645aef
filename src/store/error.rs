// ==========================================
// 成型产线产能系统 - Store 错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 变更失败时快照保持不变, 不发布事件
// ==========================================

use crate::domain::product::ProductError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// Store 错误类型
#[derive(Error, Debug)]
pub enum StoreError {
    // ===== 引用错误 =====
    #[error("机台不存在: {0}")]
    UnknownMachine(String),

    #[error("操作工组不存在: {0}")]
    UnknownGroup(String),

    #[error("产品不存在: {0}")]
    UnknownProduct(String),

    // ===== 数据质量错误 =====
    #[error("产品ID重复: {0}")]
    DuplicateProduct(String),

    #[error("产品校验失败: {0}")]
    InvalidProduct(#[from] ProductError),

    // ===== 持久化错误 =====
    #[error("快照恢复失败: {0}")]
    Repository(#[from] RepositoryError),
}

/// Result 类型别名
pub type StoreResult<T> = Result<T, StoreError>;

// ==========================================
// 成型产线产能系统 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 导入失败时引擎不会被调用
// ==========================================

use crate::domain::product::ProductError;
use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("JSON 解析失败: {0}")]
    JsonParseError(String),

    // ===== 结构错误 =====
    #[error("快照格式错误: 顶层必须是对象")]
    NotAnObject,

    #[error("产品目录格式错误: 顶层必须是数组")]
    NotAnArray,

    #[error("缺少必需字段: {0}")]
    MissingField(&'static str),

    #[error("字段类型错误 ({field}): 期望 {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("记录解析失败 ({section}[{index}]): {message}")]
    InvalidRecord {
        section: &'static str,
        index: usize,
        message: String,
    },

    #[error("时间戳格式错误: {0}")]
    InvalidTimestamp(String),

    // ===== 数据质量错误 =====
    #[error("产品校验失败 (products[{index}]): {source}")]
    InvalidProduct {
        index: usize,
        #[source]
        source: ProductError,
    },

    #[error("ID 重复 ({section}): {id}")]
    DuplicateId { section: &'static str, id: String },
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

impl From<serde_json::Error> for ImportError {
    fn from(err: serde_json::Error) -> Self {
        ImportError::JsonParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;

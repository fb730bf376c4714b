//! 分群引擎错误类型

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("规则验证失败: {0}")]
    Validation(String),

    #[error("规则还原失败: {0}")]
    Mapping(String),

    #[error("JSON 序列化错误: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;

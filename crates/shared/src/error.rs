//! 统一错误处理模块
//!
//! 定义系统中所有共享的错误类型，使用 thiserror 提供良好的错误信息。

use thiserror::Error;

/// 系统错误类型
#[derive(Debug, Error)]
pub enum CrmError {
    // ==================== 资源错误 ====================
    #[error("记录未找到: {entity} id={id}")]
    NotFound { entity: String, id: String },

    #[error("记录已存在: {entity} {field}={value}")]
    AlreadyExists {
        entity: String,
        field: String,
        value: String,
    },

    // ==================== 分群规则错误 ====================
    #[error("规则解析失败: {0}")]
    RuleParseFailed(String),

    #[error("规则验证失败: {0}")]
    RuleInvalid(String),

    // ==================== 营销活动错误 ====================
    #[error("活动状态不允许该操作: campaign_id={campaign_id}, status={status}")]
    InvalidCampaignState {
        campaign_id: String,
        status: String,
    },

    #[error("无效的投递状态: {0}")]
    InvalidDeliveryStatus(String),

    // ==================== 验证错误 ====================
    #[error("参数验证失败: {0}")]
    Validation(String),

    #[error("无效的参数: {field} - {message}")]
    InvalidArgument { field: String, message: String },

    // ==================== 权限错误 ====================
    #[error("未授权访问")]
    Unauthorized,

    // ==================== 通用错误 ====================
    #[error("JSON 处理错误: {0}")]
    Json(#[from] serde_json::Error),

    #[error("内部错误: {0}")]
    Internal(String),
}

/// 错误结果类型别名
pub type Result<T> = std::result::Result<T, CrmError>;

impl CrmError {
    /// 获取错误码（用于 API 响应和日志归类）
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::AlreadyExists { .. } => "ALREADY_EXISTS",
            Self::RuleParseFailed(_) => "RULE_PARSE_FAILED",
            Self::RuleInvalid(_) => "RULE_INVALID",
            Self::InvalidCampaignState { .. } => "INVALID_CAMPAIGN_STATE",
            Self::InvalidDeliveryStatus(_) => "INVALID_DELIVERY_STATUS",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::InvalidArgument { .. } => "INVALID_ARGUMENT",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Json(_) => "JSON_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

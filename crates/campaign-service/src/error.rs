//! 活动服务错误类型
//!
//! 统一的 API 错误，负责把领域错误映射为 HTTP 状态码和
//! `{success, code, message, data}` 响应体。

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crm_shared::error::CrmError;
use segment_engine::EngineError;

/// 活动服务错误类型
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    // 认证错误
    #[error("未授权: {0}")]
    Unauthorized(String),
    #[error("用户名或密码错误")]
    InvalidCredentials,

    // 验证错误
    #[error("参数验证失败: {0}")]
    Validation(String),
    #[error("规则无效: {0}")]
    InvalidRules(String),

    // 资源不存在
    #[error("客户不存在: {0}")]
    CustomerNotFound(String),
    #[error("活动不存在: {0}")]
    CampaignNotFound(String),
    #[error("资源不存在: {0}")]
    NotFound(String),

    // 业务错误
    #[error("活动状态不允许此操作: {0}")]
    InvalidCampaignState(String),
    #[error("投递回执状态无效: {0}")]
    InvalidDeliveryStatus(String),

    // 系统错误
    #[error("内部错误: {0}")]
    Internal(String),
}

impl ApiError {
    /// 返回对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::Validation(_) | Self::InvalidRules(_) | Self::InvalidDeliveryStatus(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::CustomerNotFound(_) | Self::CampaignNotFound(_) | Self::NotFound(_) => {
                StatusCode::NOT_FOUND
            }
            Self::InvalidCampaignState(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 返回错误码（用于 API 响应）
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::InvalidRules(_) => "INVALID_RULES",
            Self::CustomerNotFound(_) => "CUSTOMER_NOT_FOUND",
            Self::CampaignNotFound(_) => "CAMPAIGN_NOT_FOUND",
            Self::NotFound(_) => "NOT_FOUND",
            Self::InvalidCampaignState(_) => "INVALID_CAMPAIGN_STATE",
            Self::InvalidDeliveryStatus(_) => "INVALID_DELIVERY_STATUS",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // 系统级错误只返回通用提示，详细信息仅记录日志
        let message = match &self {
            Self::Internal(e) => {
                tracing::error!(error = %e, "内部错误");
                "服务内部错误，请稍后重试".to_string()
            }
            other => other.to_string(),
        };

        let body = json!({
            "success": false,
            "code": self.error_code(),
            "message": message,
            "data": null,
        });

        (status, axum::Json(body)).into_response()
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        Self::InvalidRules(err.to_string())
    }
}

impl From<CrmError> for ApiError {
    fn from(err: CrmError) -> Self {
        match err {
            CrmError::NotFound { entity, id } => match entity.as_str() {
                "customer" => Self::CustomerNotFound(id),
                "campaign" => Self::CampaignNotFound(id),
                _ => Self::NotFound(format!("{entity}/{id}")),
            },
            CrmError::InvalidCampaignState {
                campaign_id,
                status,
            } => Self::InvalidCampaignState(format!("{campaign_id} 当前状态为 {status}")),
            CrmError::InvalidDeliveryStatus(s) => Self::InvalidDeliveryStatus(s),
            CrmError::Unauthorized => Self::Unauthorized("未授权访问".to_string()),
            CrmError::Validation(msg) | CrmError::InvalidArgument { message: msg, .. } => {
                Self::Validation(msg)
            }
            CrmError::RuleParseFailed(msg) | CrmError::RuleInvalid(msg) => Self::InvalidRules(msg),
            other => Self::Internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::CampaignNotFound("c1".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::InvalidCampaignState("c1".to_string()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::InvalidRules("bad".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(
            ApiError::CustomerNotFound("x".to_string()).error_code(),
            "CUSTOMER_NOT_FOUND"
        );
        assert_eq!(
            ApiError::Unauthorized("x".to_string()).error_code(),
            "UNAUTHORIZED"
        );
    }
}

//! API 响应结构定义

use serde::Serialize;

use crm_shared::models::Campaign;
use segment_engine::Rule;

/// API 统一响应
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// 创建成功响应
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            code: "SUCCESS".to_string(),
            message: "操作成功".to_string(),
            data: Some(data),
        }
    }

    /// 创建成功响应（自定义消息）
    pub fn success_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            code: "SUCCESS".to_string(),
            message: message.into(),
            data: Some(data),
        }
    }

    /// 创建已受理响应（异步入库场景）
    pub fn accepted(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            code: "ACCEPTED".to_string(),
            message: message.into(),
            data: Some(data),
        }
    }
}

/// 登录用户信息
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: String,
    pub email: String,
    pub name: String,
}

/// 登录响应
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: UserInfo,
    pub token: String,
    pub expires_at: i64,
}

/// 受众预览响应
#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub size: usize,
}

/// 活动详情，规则已还原为树形
#[derive(Debug, Serialize)]
pub struct CampaignDetail {
    #[serde(flatten)]
    pub campaign: Campaign,
    pub rules: Vec<Rule>,
}

/// 分群建议响应
#[derive(Debug, Serialize)]
pub struct SegmentSuggestion {
    pub rules: Vec<Rule>,
    pub explanation: String,
}

/// 文案建议响应
#[derive(Debug, Serialize)]
pub struct MessageSuggestion {
    pub messages: Vec<String>,
    pub image_recommendations: Vec<String>,
}

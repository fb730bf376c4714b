//! API 请求结构定义

use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

use segment_engine::Rule;

/// 登录请求
///
/// 演示环境不校验口令，只要求字段形态合法。
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "邮箱格式不正确"))]
    pub email: String,
    #[validate(length(min = 1, message = "密码不能为空"))]
    pub password: String,
}

/// 创建客户请求
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCustomerRequest {
    #[validate(length(min = 1, max = 100, message = "姓名长度必须在 1-100 之间"))]
    pub name: String,
    #[validate(email(message = "邮箱格式不正确"))]
    pub email: String,
    #[validate(length(min = 1, max = 32, message = "电话长度必须在 1-32 之间"))]
    pub phone: String,
}

/// 更新客户请求，未提供的字段保持不变
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCustomerRequest {
    #[validate(length(min = 1, max = 100, message = "姓名长度必须在 1-100 之间"))]
    pub name: Option<String>,
    #[validate(email(message = "邮箱格式不正确"))]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 32, message = "电话长度必须在 1-32 之间"))]
    pub phone: Option<String>,
}

/// 创建订单请求
#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrderRequest {
    #[validate(length(min = 1, message = "customer_id 不能为空"))]
    pub customer_id: String,
    #[validate(range(min = 0.01, message = "金额必须大于 0"))]
    pub amount: f64,
    /// 缺省为当前时刻
    pub order_date: Option<DateTime<Utc>>,
}

/// 创建活动请求
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCampaignRequest {
    #[validate(length(min = 1, max = 200, message = "活动名称长度必须在 1-200 之间"))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub rules: Vec<Rule>,
    /// 前端预览得到的人数，执行时以实际命中数覆盖
    #[serde(default)]
    pub audience_size: usize,
}

/// 受众预览请求
#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    pub rules: Vec<Rule>,
}

/// 投递回执请求（外部供应商回调）
#[derive(Debug, Deserialize, Validate)]
pub struct DeliveryReceiptRequest {
    #[validate(length(min = 1, message = "log_id 不能为空"))]
    pub log_id: String,
    #[validate(length(min = 1, message = "status 不能为空"))]
    pub status: String,
}

/// 分群建议请求
#[derive(Debug, Deserialize, Validate)]
pub struct SegmentPromptRequest {
    #[validate(length(min = 1, message = "prompt 不能为空"))]
    pub prompt: String,
}

/// 文案建议请求，prompt 与 campaign_objective 至少提供其一
#[derive(Debug, Deserialize)]
pub struct MessagePromptRequest {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub campaign_objective: Option<String>,
}

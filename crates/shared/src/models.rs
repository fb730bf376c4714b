//! CRM 领域模型
//!
//! 定义客户、订单、营销活动和触达日志等核心实体。
//! 这些模型同时作为 API 的 JSON 载荷和内存存储的记录结构。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CrmError;

/// 客户记录
///
/// 分群引擎的候选记录，评估过程只读不可变。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub total_spend: f64,
    pub last_purchase_date: DateTime<Utc>,
    pub visit_count: i64,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    pub fn new(name: impl Into<String>, email: impl Into<String>, phone: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            total_spend: 0.0,
            last_purchase_date: now,
            visit_count: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

/// 订单记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub customer_id: String,
    pub order_date: DateTime<Utc>,
    pub amount: f64,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn new(customer_id: impl Into<String>, amount: f64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            customer_id: customer_id.into(),
            order_date: now,
            amount,
            created_at: now,
            updated_at: now,
        }
    }
}

/// 营销活动状态
///
/// 生命周期: draft -> sending -> completed，执行异常时进入 failed。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    Draft,
    Sending,
    Completed,
    Failed,
}

/// 营销活动
///
/// `rules` 以扁平行的形式持久化（见 segment-engine 的 mapping 模块），
/// 读取时还原为规则树。audience_size 在执行时以实际命中数覆盖。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Campaign {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub audience_size: usize,
    pub sent_count: usize,
    pub failed_count: usize,
    pub status: CampaignStatus,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Campaign {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            description: description.into(),
            audience_size: 0,
            sent_count: 0,
            failed_count: 0,
            status: CampaignStatus::Draft,
            created_at: now,
            updated_at: now,
        }
    }
}

/// 投递状态
///
/// 与外部投递回执接口共用的状态字符串（SENT / FAILED / PENDING）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DeliveryStatus {
    Pending,
    Sent,
    Failed,
}

impl DeliveryStatus {
    /// 解析回执中的状态字符串，未知状态视为参数错误而不是静默忽略
    pub fn parse(s: &str) -> Result<Self, CrmError> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "SENT" => Ok(Self::Sent),
            "FAILED" => Ok(Self::Failed),
            other => Err(CrmError::InvalidDeliveryStatus(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Sent => "SENT",
            Self::Failed => "FAILED",
        }
    }
}

/// 触达日志
///
/// 活动执行时为每个命中客户创建一条，模拟投递完成后由回执更新状态。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommunicationLog {
    pub id: String,
    pub campaign_id: String,
    pub customer_id: String,
    pub message: String,
    pub status: DeliveryStatus,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl CommunicationLog {
    pub fn pending(
        campaign_id: impl Into<String>,
        customer_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            campaign_id: campaign_id.into(),
            customer_id: customer_id.into(),
            message: message.into(),
            status: DeliveryStatus::Pending,
            timestamp: Utc::now(),
        }
    }
}

//! 客户分群字段
//!
//! 把可分群的客户属性收敛为一个枚举，并为每个字段提供类型化的取值函数。
//! 新增字段时只需在此补全 match 分支，不存在按字符串 key 的动态查找。

use crm_shared::models::Customer;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 可参与分群的客户字段
///
/// 未识别的字段名落到 `Unknown`，评估时判为不命中而不是中断整轮筛选。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentField {
    Name,
    Email,
    Phone,
    TotalSpend,
    LastPurchaseDate,
    VisitCount,
    #[serde(other)]
    Unknown,
}

/// 字段的比较类别
///
/// 决定条件值如何解释：文本做相等/子串比较，数值做大小比较，
/// 相对日期字段的条件值按"距今天数"解释而不是字面量。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Numeric,
    RelativeDate,
}

impl SegmentField {
    /// 字段的比较类别，Unknown 字段返回 None
    pub fn kind(&self) -> Option<FieldKind> {
        match self {
            Self::Name | Self::Email | Self::Phone => Some(FieldKind::Text),
            Self::TotalSpend | Self::VisitCount => Some(FieldKind::Numeric),
            Self::LastPurchaseDate => Some(FieldKind::RelativeDate),
            Self::Unknown => None,
        }
    }

    /// 取文本字段值，非文本字段返回 None
    pub fn text<'a>(&self, customer: &'a Customer) -> Option<&'a str> {
        match self {
            Self::Name => Some(&customer.name),
            Self::Email => Some(&customer.email),
            Self::Phone => Some(&customer.phone),
            _ => None,
        }
    }

    /// 取数值字段值，非数值字段返回 None
    pub fn numeric(&self, customer: &Customer) -> Option<f64> {
        match self {
            Self::TotalSpend => Some(customer.total_spend),
            Self::VisitCount => Some(customer.visit_count as f64),
            _ => None,
        }
    }
}

impl fmt::Display for SegmentField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::TotalSpend => "total_spend",
            Self::LastPurchaseDate => "last_purchase_date",
            Self::VisitCount => "visit_count",
            Self::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}

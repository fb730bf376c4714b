//! 规则操作符定义

use serde::{Deserialize, Serialize};
use std::fmt;

/// 条件操作符
///
/// 序列化形式与前端规则编辑器的下拉选项一致（"="、">"、"contains" 等）。
/// 未识别的操作符不在反序列化时报错，而是落到 `Unknown`，
/// 由评估器将对应条件判为不命中。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    // 相等比较
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "!=")]
    Ne,

    // 大小比较（数值字段，或相对日期字段）
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "<=")]
    Le,

    // 子串包含（文本字段）
    #[serde(rename = "contains")]
    Contains,
    #[serde(rename = "not_contains")]
    NotContains,

    #[serde(other)]
    Unknown,
}

impl Operator {
    /// 大小比较类操作符
    pub fn is_ordering(&self) -> bool {
        matches!(self, Self::Gt | Self::Lt | Self::Ge | Self::Le)
    }

    /// 相等类操作符
    pub fn is_equality(&self) -> bool {
        matches!(self, Self::Eq | Self::Ne)
    }

    /// 子串包含类操作符
    pub fn is_containment(&self) -> bool {
        matches!(self, Self::Contains | Self::NotContains)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Gt => ">",
            Self::Lt => "<",
            Self::Ge => ">=",
            Self::Le => "<=",
            Self::Contains => "contains",
            Self::NotContains => "not_contains",
            Self::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}

/// 逻辑组合符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Combinator {
    And,
    Or,
}

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::And => write!(f, "AND"),
            Self::Or => write!(f, "OR"),
        }
    }
}

//! 规则树数据模型
//!
//! 规则是一棵由条件叶子和 AND/OR 逻辑组构成的树。条件与组在类型上
//! 分开表达（带标签的和类型），"条件必须有 field/operator/value、
//! 组必须有 combinator/children" 由编译器保证而非运行时检查。

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::fields::SegmentField;
use crate::operators::{Combinator, Operator};

fn new_node_id() -> String {
    Uuid::new_v4().to_string()
}

/// 规则节点（条件或逻辑组）
///
/// 线上 JSON 形态：
/// `{ "id", "type": "condition" | "group", "field"?, "operator"?, "value"?,
///    "combinator"?, "rules"?: [Rule] }`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Rule {
    Condition(Condition),
    Group(RuleGroup),
}

impl Rule {
    pub fn condition(field: SegmentField, operator: Operator, value: impl Into<Value>) -> Self {
        Self::Condition(Condition::new(field, operator, value))
    }

    pub fn and(rules: Vec<Rule>) -> Self {
        Self::Group(RuleGroup::and(rules))
    }

    pub fn or(rules: Vec<Rule>) -> Self {
        Self::Group(RuleGroup::or(rules))
    }

    /// 节点 ID（验证错误定位用）
    pub fn id(&self) -> &str {
        match self {
            Self::Condition(c) => &c.id,
            Self::Group(g) => &g.id,
        }
    }
}

/// 条件叶子节点
///
/// `value` 保留为 JSON 字面量（字符串或数字），评估时按字段类别被
/// 强制到对应类型；无法强制时该条件判为不命中。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Condition {
    #[serde(default = "new_node_id")]
    pub id: String,
    pub field: SegmentField,
    pub operator: Operator,
    #[serde(default)]
    pub value: Value,
}

impl Condition {
    pub fn new(field: SegmentField, operator: Operator, value: impl Into<Value>) -> Self {
        Self {
            id: new_node_id(),
            field,
            operator,
            value: value.into(),
        }
    }
}

/// 逻辑组节点
///
/// 子节点序列允许为空：空 AND 组恒为真，空 OR 组恒为假（见 audience 模块）。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleGroup {
    #[serde(default = "new_node_id")]
    pub id: String,
    pub combinator: Combinator,
    #[serde(default)]
    pub rules: Vec<Rule>,
}

impl RuleGroup {
    pub fn new(combinator: Combinator, rules: Vec<Rule>) -> Self {
        Self {
            id: new_node_id(),
            combinator,
            rules,
        }
    }

    pub fn and(rules: Vec<Rule>) -> Self {
        Self::new(Combinator::And, rules)
    }

    pub fn or(rules: Vec<Rule>) -> Self {
        Self::new(Combinator::Or, rules)
    }
}

//! 规则树与扁平存储行的互转
//!
//! 规则树持久化为带父节点标记的扁平行列表（每行一个节点，
//! `parent_id` 指向父组，`position` 记录在父组内的次序），
//! 读取时按父节点分组、按次序排序后还原为树。

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::error::{EngineError, Result};
use crate::models::{Condition, Rule, RuleGroup};
use crate::operators::Combinator;

/// 扁平存储行
///
/// 条件行填 field/operator/value，组行填 combinator，
/// 顶层节点 `parent_id` 为 None。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredRule {
    pub id: String,
    pub parent_id: Option<String>,
    pub position: usize,
    pub node_type: StoredNodeType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub combinator: Option<Combinator>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoredNodeType {
    Condition,
    Group,
}

/// 规则列表展开为扁平行，深度优先，次序保留在 `position` 中
pub fn flatten(rules: &[Rule]) -> Vec<StoredRule> {
    let mut rows = Vec::new();
    for (i, rule) in rules.iter().enumerate() {
        flatten_node(rule, None, i, &mut rows);
    }
    rows
}

fn flatten_node(rule: &Rule, parent_id: Option<&str>, position: usize, rows: &mut Vec<StoredRule>) {
    match rule {
        Rule::Condition(condition) => rows.push(StoredRule {
            id: condition.id.clone(),
            parent_id: parent_id.map(str::to_string),
            position,
            node_type: StoredNodeType::Condition,
            field: Some(field_name(condition)),
            operator: Some(condition.operator.to_string()),
            value: Some(condition.value.clone()),
            combinator: None,
        }),
        Rule::Group(group) => {
            rows.push(StoredRule {
                id: group.id.clone(),
                parent_id: parent_id.map(str::to_string),
                position,
                node_type: StoredNodeType::Group,
                field: None,
                operator: None,
                value: None,
                combinator: Some(group.combinator),
            });
            for (i, child) in group.rules.iter().enumerate() {
                flatten_node(child, Some(&group.id), i, rows);
            }
        }
    }
}

fn field_name(condition: &Condition) -> String {
    condition.field.to_string()
}

/// 扁平行还原为规则列表
///
/// 行顺序不敏感：先按 `parent_id` 分组，组内按 `position` 排序，
/// 再自顶向下重建。条件行缺失 field/operator 视为数据损坏。
pub fn restore(rows: &[StoredRule]) -> Result<Vec<Rule>> {
    let mut children: HashMap<Option<&str>, Vec<&StoredRule>> = HashMap::new();
    for row in rows {
        children.entry(row.parent_id.as_deref()).or_default().push(row);
    }
    for group in children.values_mut() {
        group.sort_by_key(|row| row.position);
    }

    let roots = children.get(&None).cloned().unwrap_or_default();
    roots
        .into_iter()
        .map(|row| restore_node(row, &children))
        .collect()
}

fn restore_node(
    row: &StoredRule,
    children: &HashMap<Option<&str>, Vec<&StoredRule>>,
) -> Result<Rule> {
    match row.node_type {
        StoredNodeType::Condition => {
            let field = row.field.as_deref().ok_or_else(|| {
                EngineError::Mapping(format!("条件行 {} 缺少 field", row.id))
            })?;
            let operator = row.operator.as_deref().ok_or_else(|| {
                EngineError::Mapping(format!("条件行 {} 缺少 operator", row.id))
            })?;

            // 字段与运算符复用线上 JSON 的反序列化，未知名称落到 Unknown
            let field = serde_json::from_value(Value::String(field.to_string()))?;
            let operator = serde_json::from_value(Value::String(operator.to_string()))?;

            Ok(Rule::Condition(Condition {
                id: row.id.clone(),
                field,
                operator,
                value: row.value.clone().unwrap_or(Value::Null),
            }))
        }
        StoredNodeType::Group => {
            let combinator = row.combinator.ok_or_else(|| {
                EngineError::Mapping(format!("组行 {} 缺少 combinator", row.id))
            })?;
            let rules = children
                .get(&Some(row.id.as_str()))
                .map(|rows| {
                    rows.iter()
                        .map(|child| restore_node(child, children))
                        .collect::<Result<Vec<_>>>()
                })
                .transpose()?
                .unwrap_or_default();

            Ok(Rule::Group(RuleGroup {
                id: row.id.clone(),
                combinator,
                rules,
            }))
        }
    }
}

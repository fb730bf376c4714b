//! 受众匹配与筛选
//!
//! 在规则树上递归求值并对客户集合做筛选。预览人数与执行收件人
//! 走同一条求值路径，同一 (规则, 客户集合, now) 三元组的结果完全一致。

use chrono::{DateTime, Utc};

use crm_shared::models::Customer;

use crate::evaluator::ConditionEvaluator;
use crate::models::{Rule, RuleGroup};
use crate::operators::Combinator;

/// 递归评估规则树，返回客户是否命中
///
/// AND 组短路于第一个不命中的子节点，OR 组短路于第一个命中的子节点。
/// 空 AND 组恒为真（空合取），空 OR 组恒为假（空析取）。
pub fn matches(rule: &Rule, customer: &Customer, now: DateTime<Utc>) -> bool {
    let evaluator = ConditionEvaluator::new();
    matches_with(&evaluator, rule, customer, now)
}

fn matches_with(
    evaluator: &ConditionEvaluator,
    rule: &Rule,
    customer: &Customer,
    now: DateTime<Utc>,
) -> bool {
    match rule {
        Rule::Condition(condition) => evaluator.evaluate(condition, customer, now),
        Rule::Group(group) => matches_group(evaluator, group, customer, now),
    }
}

fn matches_group(
    evaluator: &ConditionEvaluator,
    group: &RuleGroup,
    customer: &Customer,
    now: DateTime<Utc>,
) -> bool {
    match group.combinator {
        Combinator::And => group
            .rules
            .iter()
            .all(|rule| matches_with(evaluator, rule, customer, now)),
        Combinator::Or => group
            .rules
            .iter()
            .any(|rule| matches_with(evaluator, rule, customer, now)),
    }
}

/// 评估顶层规则列表（隐式 AND）
///
/// 活动的规则以列表形式提交，客户须命中列表中的每一条。
/// 空列表匹配所有客户。
pub fn matches_all(rules: &[Rule], customer: &Customer, now: DateTime<Utc>) -> bool {
    let evaluator = ConditionEvaluator::new();
    rules
        .iter()
        .all(|rule| matches_with(&evaluator, rule, customer, now))
}

/// 从客户集合中筛选命中规则的客户，保持输入顺序
pub fn filter<'a>(rules: &[Rule], customers: &'a [Customer], now: DateTime<Utc>) -> Vec<&'a Customer> {
    customers
        .iter()
        .filter(|customer| matches_all(rules, customer, now))
        .collect()
}

/// 受众预览人数
///
/// 与 [`filter`] 共用同一求值路径，预览人数恒等于筛选结果长度。
pub fn preview_size(rules: &[Rule], customers: &[Customer], now: DateTime<Utc>) -> usize {
    customers
        .iter()
        .filter(|customer| matches_all(rules, customer, now))
        .count()
}

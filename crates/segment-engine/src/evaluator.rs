//! 条件评估器
//!
//! 在单个客户上评估单个条件叶子。所有异常输入（未知字段、未知运算符、
//! 值无法强制到字段类型、运算符与字段类别不兼容）一律吸收为不命中，
//! 评估过程永不抛错，保证整体筛选对任意规则输入都能完成。

use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use tracing::debug;

use crm_shared::models::Customer;

use crate::fields::FieldKind;
use crate::models::Condition;
use crate::operators::Operator;

/// 浮点等值比较容差
const F64_EPSILON: f64 = 1e-9;

/// 条件评估器
///
/// 无状态，所有方法按值比较。预览和执行共用同一实例，
/// 保证两条路径对同一规则给出同一结果。
#[derive(Debug, Clone, Copy, Default)]
pub struct ConditionEvaluator;

impl ConditionEvaluator {
    pub fn new() -> Self {
        Self
    }

    /// 评估条件，返回客户是否命中
    ///
    /// `now` 由调用方传入，相对日期条件以它为基准折算截止时刻，
    /// 同一次筛选中的所有客户共享同一个基准。
    pub fn evaluate(&self, condition: &Condition, customer: &Customer, now: DateTime<Utc>) -> bool {
        let Some(kind) = condition.field.kind() else {
            debug!(condition_id = %condition.id, "跳过未知字段条件");
            return false;
        };

        if matches!(condition.operator, Operator::Unknown) {
            debug!(condition_id = %condition.id, "跳过未知运算符条件");
            return false;
        }

        match kind {
            FieldKind::Text => self.evaluate_text(condition, customer),
            FieldKind::Numeric => self.evaluate_numeric(condition, customer),
            FieldKind::RelativeDate => self.evaluate_relative_date(condition, customer, now),
        }
    }

    /// 文本字段：等值 / 包含，排序运算符不适用
    fn evaluate_text(&self, condition: &Condition, customer: &Customer) -> bool {
        let Some(actual) = condition.field.text(customer) else {
            return false;
        };
        let Some(expected) = coerce_text(&condition.value) else {
            return false;
        };

        match condition.operator {
            Operator::Eq => actual == expected,
            Operator::Ne => actual != expected,
            Operator::Contains => actual.contains(&expected),
            Operator::NotContains => !actual.contains(&expected),
            _ => false,
        }
    }

    /// 数值字段：全部六个比较运算符，包含运算符不适用
    fn evaluate_numeric(&self, condition: &Condition, customer: &Customer) -> bool {
        let Some(actual) = condition.field.numeric(customer) else {
            return false;
        };
        let Some(expected) = coerce_numeric(&condition.value) else {
            return false;
        };

        match condition.operator {
            Operator::Eq => (actual - expected).abs() < F64_EPSILON,
            Operator::Ne => (actual - expected).abs() >= F64_EPSILON,
            Operator::Gt => actual > expected,
            Operator::Lt => actual < expected,
            Operator::Ge => actual >= expected,
            Operator::Le => actual <= expected,
            _ => false,
        }
    }

    /// 相对日期字段：条件值是"距今天数"，折算为截止时刻
    /// `cutoff = now - N 天` 后对购买时间直接应用运算符。
    /// `< N` 即购买时间早于截止（超过 N 天未购买），
    /// `> N` 即购买时间晚于截止（N 天内购买过）。
    fn evaluate_relative_date(
        &self,
        condition: &Condition,
        customer: &Customer,
        now: DateTime<Utc>,
    ) -> bool {
        let Some(days) = coerce_numeric(&condition.value) else {
            return false;
        };
        if !days.is_finite() {
            return false;
        }

        let cutoff = now - Duration::seconds((days * 86_400.0) as i64);
        let actual = customer.last_purchase_date;

        match condition.operator {
            // 等值按截止时刻所在自然日比较
            Operator::Eq => actual.date_naive() == cutoff.date_naive(),
            Operator::Ne => actual.date_naive() != cutoff.date_naive(),
            Operator::Lt => actual < cutoff,
            Operator::Gt => actual > cutoff,
            Operator::Le => actual <= cutoff,
            Operator::Ge => actual >= cutoff,
            _ => false,
        }
    }
}

/// 条件值强制为文本，数字字面量按十进制转为字符串
fn coerce_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// 条件值强制为数值，接受 JSON 数字和数字字符串
fn coerce_numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

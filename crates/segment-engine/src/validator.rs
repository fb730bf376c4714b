//! 规则树验证器
//!
//! 在保存或执行前对规则树做结构检查。验证与评估的宽容度不同：
//! 评估器把异常条件吸收为不命中，验证器负责把明显写错的规则
//! 在入口处报出来，错误信息带节点路径便于前端定位。

use crate::error::{EngineError, Result};
use crate::models::Rule;
use crate::operators::Operator;

/// 嵌套深度上限，防御恶意或失控的深层嵌套
const MAX_DEPTH: usize = 32;

/// 验证规则列表（宽松模式）
///
/// 检查条件值非 null、嵌套深度不超限。未知字段与未知运算符
/// 放行（评估时判不命中），空组放行（有明确定义的真值）。
pub fn validate(rules: &[Rule]) -> Result<()> {
    for (i, rule) in rules.iter().enumerate() {
        validate_node(rule, &format!("root[{i}]"), 0, false)?;
    }
    Ok(())
}

/// 验证规则列表（严格模式）
///
/// 在宽松模式基础上额外拒绝未知字段与未知运算符，
/// 用于保存活动时尽早暴露拼写错误。
pub fn validate_strict(rules: &[Rule]) -> Result<()> {
    for (i, rule) in rules.iter().enumerate() {
        validate_node(rule, &format!("root[{i}]"), 0, true)?;
    }
    Ok(())
}

fn validate_node(rule: &Rule, path: &str, depth: usize, strict: bool) -> Result<()> {
    if depth > MAX_DEPTH {
        return Err(EngineError::Validation(format!(
            "{path}: 规则嵌套深度超过上限 {MAX_DEPTH}"
        )));
    }

    match rule {
        Rule::Condition(condition) => {
            if condition.value.is_null() {
                return Err(EngineError::Validation(format!(
                    "{path}: 条件缺少比较值"
                )));
            }
            if strict {
                if condition.field.kind().is_none() {
                    return Err(EngineError::Validation(format!("{path}: 未知字段")));
                }
                if matches!(condition.operator, Operator::Unknown) {
                    return Err(EngineError::Validation(format!("{path}: 未知运算符")));
                }
            }
            Ok(())
        }
        Rule::Group(group) => {
            for (i, child) in group.rules.iter().enumerate() {
                validate_node(child, &format!("{path}.rules[{i}]"), depth + 1, strict)?;
            }
            Ok(())
        }
    }
}

//! 分群规则引擎
//!
//! 提供营销活动的人群分选能力，支持：
//! - JSON 规则树定义和解析（条件 + AND/OR 组合的递归结构）
//! - 类型化的客户字段访问和比较语义
//! - 人群预览和活动执行共用同一份评估逻辑
//! - 规则树与扁平持久化行的互转
//!
//! 评估是纯同步计算：只读输入、分配输出，无任何共享状态，
//! 可被多个请求并发调用。

pub mod audience;
pub mod error;
pub mod evaluator;
pub mod fields;
pub mod mapping;
pub mod models;
pub mod operators;
pub mod validator;

pub use audience::{filter, matches, matches_all, preview_size};
pub use error::{EngineError, Result};
pub use evaluator::ConditionEvaluator;
pub use fields::{FieldKind, SegmentField};
pub use mapping::{StoredRule, flatten, restore};
pub use models::{Condition, Rule, RuleGroup};
pub use operators::{Combinator, Operator};
pub use validator::{validate, validate_strict};

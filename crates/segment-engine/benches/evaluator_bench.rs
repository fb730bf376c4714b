//! 分群引擎性能基准测试
//!
//! 覆盖单条件评估、嵌套规则树匹配和整库筛选三个层级。

use chrono::{Duration, Utc};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

use crm_shared::models::Customer;
use segment_engine::{
    filter, matches, Condition, ConditionEvaluator, Operator, Rule, SegmentField,
};

fn make_customer(i: usize) -> Customer {
    let mut c = Customer::new(
        format!("customer-{i}"),
        format!("customer{i}@example.com"),
        format!("138{:08}", i),
    );
    c.total_spend = (i as f64) * 137.5;
    c.visit_count = (i % 20) as i64;
    c.last_purchase_date = Utc::now() - Duration::days((i % 365) as i64);
    c
}

fn nested_rule() -> Rule {
    Rule::and(vec![
        Rule::condition(SegmentField::TotalSpend, Operator::Gt, 5000),
        Rule::or(vec![
            Rule::condition(SegmentField::VisitCount, Operator::Gt, 10),
            Rule::condition(SegmentField::VisitCount, Operator::Lt, 2),
        ]),
        Rule::condition(SegmentField::Email, Operator::Contains, "@example.com"),
    ])
}

/// 单条件评估基准
fn bench_single_condition(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_condition");
    let evaluator = ConditionEvaluator::new();
    let customer = make_customer(42);
    let now = Utc::now();

    let numeric = Condition::new(SegmentField::TotalSpend, Operator::Gt, 5000);
    group.bench_function("numeric_gt", |b| {
        b.iter(|| evaluator.evaluate(black_box(&numeric), black_box(&customer), now))
    });

    let text = Condition::new(SegmentField::Email, Operator::Contains, "@example.com");
    group.bench_function("text_contains", |b| {
        b.iter(|| evaluator.evaluate(black_box(&text), black_box(&customer), now))
    });

    let date = Condition::new(SegmentField::LastPurchaseDate, Operator::Lt, 90);
    group.bench_function("relative_date_lt", |b| {
        b.iter(|| evaluator.evaluate(black_box(&date), black_box(&customer), now))
    });

    group.finish();
}

/// 嵌套规则树匹配基准
fn bench_nested_tree(c: &mut Criterion) {
    let rule = nested_rule();
    let customer = make_customer(42);
    let now = Utc::now();

    c.bench_function("nested_tree_match", |b| {
        b.iter(|| matches(black_box(&rule), black_box(&customer), now))
    });
}

/// 不同规模客户集合的筛选基准
fn bench_filter_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter_scaling");
    let rules = vec![nested_rule()];
    let now = Utc::now();

    for size in [100, 1_000, 10_000] {
        let customers: Vec<Customer> = (0..size).map(make_customer).collect();
        group.bench_with_input(BenchmarkId::from_parameter(size), &customers, |b, cs| {
            b.iter(|| filter(black_box(&rules), black_box(cs), now))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_single_condition,
    bench_nested_tree,
    bench_filter_scaling
);
criterion_main!(benches);

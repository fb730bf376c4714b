//! 演示数据生成
//!
//! 启动时为空的客户表生成仿真客户与订单，消费金额、到店次数、
//! 最近购买时间覆盖常用分群条件的取值区间。

use chrono::{Duration, Utc};
use fake::Fake;
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use rand::Rng;
use tracing::info;

use crm_shared::models::{Customer, Order};

use crate::state::AppState;

/// 生成演示客户与订单
///
/// 客户表非空时跳过，重复启动不会叠加数据。
pub fn seed_demo_data(state: &AppState, customer_count: usize) {
    if state.customers.count() > 0 {
        return;
    }

    let mut rng = rand::rng();

    for _ in 0..customer_count {
        let mut customer = Customer::new(
            Name().fake::<String>(),
            SafeEmail().fake::<String>(),
            format!("+86138{:08}", rng.random_range(0..100_000_000u64)),
        );
        customer.total_spend = rng.random_range(1000.0_f64..20000.0).round();
        customer.visit_count = rng.random_range(1..=20);
        customer.last_purchase_date = Utc::now() - Duration::days(rng.random_range(0..180));
        let customer_id = customer.id.clone();
        state.customers.insert(&customer_id, customer);

        // 每个客户 1-5 笔历史订单
        let order_count = rng.random_range(1..=5);
        for _ in 0..order_count {
            let mut order = Order::new(
                customer_id.clone(),
                rng.random_range(200.0_f64..2200.0).round(),
            );
            order.order_date = Utc::now() - Duration::days(rng.random_range(0..180));
            state.orders.insert(&order.id.clone(), order);
        }
    }

    info!(
        customers = state.customers.count(),
        orders = state.orders.count(),
        "演示数据已生成"
    );
}

//! 订单管理 API 处理器
//!
//! 订单创建走异步队列，消费端入库时同步刷新客户消费统计。

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::{Value, json};
use tracing::info;
use validator::Validate;

use crm_shared::models::Order;

use crate::{
    dto::{ApiResponse, CreateOrderRequest},
    error::ApiError,
    state::AppState,
};

/// 获取订单列表
///
/// GET /api/orders
pub async fn list_orders(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Order>>>, ApiError> {
    let mut orders = state.orders.list();
    orders.sort_by(|a, b| b.order_date.cmp(&a.order_date));
    Ok(Json(ApiResponse::success(orders)))
}

/// 创建订单（异步入库）
///
/// POST /api/orders，客户必须已存在；受理后返回 202。
pub async fn create_order(
    State(state): State<AppState>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Value>>), ApiError> {
    req.validate()?;

    if state.customers.get(&req.customer_id).is_none() {
        return Err(ApiError::CustomerNotFound(req.customer_id));
    }

    let mut order = Order::new(req.customer_id, req.amount);
    if let Some(order_date) = req.order_date {
        order.order_date = order_date;
    }
    let id = order.id.clone();

    state
        .queue
        .publish_order(state.orders.clone(), state.customers.clone(), order);
    info!(order_id = %id, "订单创建请求已受理");

    Ok((
        StatusCode::ACCEPTED,
        Json(ApiResponse::accepted(json!({ "id": id }), "订单创建请求已受理")),
    ))
}

/// 更新订单金额或日期
///
/// PUT /api/orders/{id}
pub async fn update_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<Json<ApiResponse<Order>>, ApiError> {
    req.validate()?;

    let hit = state.orders.update(&id, |order| {
        order.amount = req.amount;
        if let Some(order_date) = req.order_date {
            order.order_date = order_date;
        }
        order.updated_at = chrono::Utc::now();
    });

    if !hit {
        return Err(ApiError::NotFound(format!("order/{id}")));
    }

    let order = state
        .orders
        .get(&id)
        .ok_or_else(|| ApiError::NotFound(format!("order/{id}")))?;
    Ok(Json(ApiResponse::success(order)))
}

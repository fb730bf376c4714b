//! 客户管理 API 处理器
//!
//! 创建走异步队列（返回 202），读取与更新直接操作内存存储。

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::{Value, json};
use tracing::info;
use validator::Validate;

use crm_shared::models::{Customer, Order};

use crate::{
    dto::{ApiResponse, CreateCustomerRequest, UpdateCustomerRequest},
    error::ApiError,
    state::AppState,
};

/// 获取客户列表
///
/// GET /api/customers
pub async fn list_customers(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Customer>>>, ApiError> {
    let mut customers = state.customers.list();
    customers.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(Json(ApiResponse::success(customers)))
}

/// 获取单个客户
///
/// GET /api/customers/{id}
pub async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Customer>>, ApiError> {
    let customer = state
        .customers
        .get(&id)
        .ok_or_else(|| ApiError::CustomerNotFound(id))?;
    Ok(Json(ApiResponse::success(customer)))
}

/// 创建客户（异步入库）
///
/// POST /api/customers，请求受理后返回 202，客户在短暂延迟后可见。
pub async fn create_customer(
    State(state): State<AppState>,
    Json(req): Json<CreateCustomerRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Value>>), ApiError> {
    req.validate()?;

    let customer = Customer::new(req.name, req.email, req.phone);
    let id = customer.id.clone();

    state.queue.publish_customer(state.customers.clone(), customer);
    info!(customer_id = %id, "客户创建请求已受理");

    Ok((
        StatusCode::ACCEPTED,
        Json(ApiResponse::accepted(json!({ "id": id }), "客户创建请求已受理")),
    ))
}

/// 更新客户
///
/// PUT /api/customers/{id}
pub async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateCustomerRequest>,
) -> Result<Json<ApiResponse<Customer>>, ApiError> {
    req.validate()?;

    let hit = state.customers.update(&id, |customer| {
        if let Some(name) = &req.name {
            customer.name = name.clone();
        }
        if let Some(email) = &req.email {
            customer.email = email.clone();
        }
        if let Some(phone) = &req.phone {
            customer.phone = phone.clone();
        }
        customer.updated_at = chrono::Utc::now();
    });

    if !hit {
        return Err(ApiError::CustomerNotFound(id));
    }

    let customer = state
        .customers
        .get(&id)
        .ok_or_else(|| ApiError::CustomerNotFound(id))?;
    Ok(Json(ApiResponse::success(customer)))
}

/// 删除客户
///
/// DELETE /api/customers/{id}
pub async fn delete_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    state
        .customers
        .remove(&id)
        .ok_or_else(|| ApiError::CustomerNotFound(id.clone()))?;

    info!(customer_id = %id, "客户已删除");
    Ok(Json(ApiResponse::success_with_message(
        json!({ "id": id }),
        "客户已删除",
    )))
}

/// 获取客户的订单列表
///
/// GET /api/customers/{id}/orders
pub async fn list_customer_orders(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<Order>>>, ApiError> {
    if state.customers.get(&id).is_none() {
        return Err(ApiError::CustomerNotFound(id));
    }

    let mut orders = state.orders.list_by(|order| order.customer_id == id);
    orders.sort_by(|a, b| b.order_date.cmp(&a.order_date));
    Ok(Json(ApiResponse::success(orders)))
}

//! 路由配置模块
//!
//! 定义所有 REST API 端点的路由映射

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::{handlers, state::AppState};

/// 构建认证相关的路由（公开路由，无需认证）
pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(handlers::auth::login))
}

/// 构建客户与订单管理路由
pub fn crm_routes() -> Router<AppState> {
    Router::new()
        // 客户管理
        .route("/customers", get(handlers::customer::list_customers))
        .route("/customers", post(handlers::customer::create_customer))
        .route("/customers/{id}", get(handlers::customer::get_customer))
        .route("/customers/{id}", put(handlers::customer::update_customer))
        .route(
            "/customers/{id}",
            delete(handlers::customer::delete_customer),
        )
        .route(
            "/customers/{id}/orders",
            get(handlers::customer::list_customer_orders),
        )
        // 订单管理
        .route("/orders", get(handlers::order::list_orders))
        .route("/orders", post(handlers::order::create_order))
        .route("/orders/{id}", put(handlers::order::update_order))
}

/// 构建活动管理路由
pub fn campaign_routes() -> Router<AppState> {
    Router::new()
        .route("/campaigns", get(handlers::campaign::list_campaigns))
        .route("/campaigns", post(handlers::campaign::create_campaign))
        .route(
            "/campaigns/preview",
            post(handlers::campaign::preview_audience),
        )
        .route("/campaigns/{id}", get(handlers::campaign::get_campaign))
        .route(
            "/campaigns/{id}",
            delete(handlers::campaign::delete_campaign),
        )
        .route(
            "/campaigns/{id}/execute",
            post(handlers::campaign::execute_campaign),
        )
}

/// 构建营销助手路由
pub fn assistant_routes() -> Router<AppState> {
    Router::new()
        .route("/ai/segment", post(handlers::assistant::suggest_segment))
        .route("/ai/message", post(handlers::assistant::suggest_message))
}

/// 构建投递回执路由（公开路由，供应商回调）
pub fn delivery_routes() -> Router<AppState> {
    Router::new().route(
        "/delivery/receipt",
        post(handlers::delivery::receive_receipt),
    )
}

/// 汇总 /api 下的全部路由
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(crm_routes())
        .merge(campaign_routes())
        .merge(assistant_routes())
        .merge(delivery_routes())
}

//! 活动服务 HTTP 集成测试
//!
//! 在完整路由和认证中间件上用 oneshot 请求走全链路：
//! 登录换取 Token、认证拦截、预览与回执端点。

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    middleware,
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use campaign_service::{middleware::auth_middleware, routes, state::AppState};
use crm_shared::models::Customer;

fn test_app(state: AppState) -> Router {
    Router::new()
        .nest("/api", routes::api_routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn login_token(app: &Router) -> String {
    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({"email": "demo@example.com", "password": "secret"}).to_string(),
        ))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    body["data"]["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn protected_route_requires_token() {
    let app = test_app(AppState::default());

    let request = Request::builder()
        .method("GET")
        .uri("/api/customers")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn login_then_list_customers() {
    let state = AppState::default();
    let customer = Customer::new("测试客户", "c@example.com", "13800000000");
    state.customers.insert(&customer.id.clone(), customer);

    let app = test_app(state);
    let token = login_token(&app).await;

    let request = Request::builder()
        .method("GET")
        .uri("/api/customers")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn preview_returns_audience_size() {
    let state = AppState::default();
    for (name, spend) in [("a", 8000.0), ("b", 2000.0), ("c", 9000.0)] {
        let mut customer = Customer::new(name, format!("{name}@example.com"), "13800000000");
        customer.total_spend = spend;
        state.customers.insert(&customer.id.clone(), customer);
    }

    let app = test_app(state);
    let token = login_token(&app).await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/campaigns/preview")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(
            json!({
                "rules": [
                    {"type": "condition", "field": "total_spend", "operator": ">", "value": 5000}
                ]
            })
            .to_string(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["data"]["size"], 2);
}

#[tokio::test]
async fn delivery_receipt_is_public() {
    let app = test_app(AppState::default());

    let request = Request::builder()
        .method("POST")
        .uri("/api/delivery/receipt")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({"log_id": "log-1", "status": "SENT"}).to_string(),
        ))
        .unwrap();

    // 无 Token 也能受理（供应商回调无认证）
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);
}

#[tokio::test]
async fn malformed_rules_get_bad_request() {
    let app = test_app(AppState::default());
    let token = login_token(&app).await;

    // 条件缺少 value，验证器拒绝
    let request = Request::builder()
        .method("POST")
        .uri("/api/campaigns/preview")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(
            json!({
                "rules": [
                    {"type": "condition", "field": "email", "operator": "="}
                ]
            })
            .to_string(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["code"], "INVALID_RULES");
}

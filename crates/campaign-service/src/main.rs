//! 营销活动服务入口
//!
//! 提供客户、订单、活动管理和分群筛选的 REST API。

use axum::{Json, Router, http::HeaderValue, middleware, routing::get};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use campaign_service::{
    auth::JwtConfig,
    middleware::auth_middleware,
    routes, seed,
    state::AppState,
};
use crm_shared::{config::AppConfig, observability};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 统一加载配置：config/default.toml + config/{CRM_ENV}.toml + 环境变量
    let config = AppConfig::load("campaign-service")?;

    let _guard = observability::init(&config.observability, &config.service_name)?;

    info!("Starting campaign-service on {}", config.server_addr());

    // JWT 密钥：生产环境必须通过配置注入，开发环境允许默认值
    if config.is_production()
        && config.auth.jwt_secret == crm_shared::config::AuthConfig::default().jwt_secret
    {
        anyhow::bail!("生产环境必须设置 CRM_AUTH_JWT_SECRET");
    }
    if !config.is_production() {
        warn!("使用开发默认 JWT 密钥，生产环境请设置 CRM_AUTH_JWT_SECRET");
    }

    let jwt_config = JwtConfig {
        secret: config.auth.jwt_secret.clone(),
        expires_in_secs: config.auth.jwt_expires_secs,
        issuer: "campaign-service".to_string(),
    };

    let state = AppState::new(jwt_config, config.delivery.clone());

    // 演示数据
    if config.seed.enabled {
        seed::seed_demo_data(&state, config.seed.customer_count);
    }

    // CORS：通过 CRM_CORS_ORIGINS 环境变量控制允许的来源
    let allowed_origins = std::env::var("CRM_CORS_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:5173,http://localhost:3000".to_string());

    let cors = if allowed_origins == "*" {
        if config.is_production() {
            warn!("CRM_CORS_ORIGINS=\"*\" 在生产环境中不安全，请设置为具体域名");
        }
        info!("CORS allowed_origins: * (all origins)");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        info!("CORS allowed_origins: {}", allowed_origins);
        let origins: Vec<_> = allowed_origins
            .split(',')
            .filter_map(|s| s.trim().parse::<HeaderValue>().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let app = Router::new()
        .nest("/api", routes::api_routes())
        .route("/health", get(health_check))
        .layer(cors)
        // 认证中间件：验证 JWT Token
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        // 可观测性中间件：请求追踪和请求 ID
        .layer(middleware::from_fn(observability::middleware::http_tracing))
        .layer(middleware::from_fn(observability::middleware::request_id))
        .with_state(state);

    let listener = TcpListener::bind(config.server_addr()).await?;
    info!("Listening on {}", config.server_addr());

    // 优雅关闭：收到 SIGTERM 或 Ctrl+C 时停止接收新连接并等待已有请求完成
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");

    Ok(())
}

/// 监听关闭信号
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("注册 Ctrl+C 处理器失败");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("注册 SIGTERM 处理器失败")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, initiating graceful shutdown..."),
        _ = terminate => info!("Received SIGTERM, initiating graceful shutdown..."),
    }
}

/// 存活探针：服务进程正常即返回 ok
async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "campaign-service"
    }))
}

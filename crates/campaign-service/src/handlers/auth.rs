//! 认证 API 处理器
//!
//! 演示环境的登录是桩实现：不校验口令，任意合法邮箱都能换取
//! 真实签发的 JWT，后续请求经由认证中间件验证该 Token。

use axum::{Json, extract::State};
use tracing::info;
use validator::Validate;

use crate::{
    dto::{ApiResponse, LoginRequest, LoginResponse, UserInfo},
    error::ApiError,
    state::AppState,
};

/// 登录
///
/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    req.validate()?;

    let user_id = "user_demo_001";
    let (token, expires_at) = state.jwt_manager.generate_token(user_id, &req.email)?;

    info!(user_id, email = %req.email, "用户登录");

    let resp = LoginResponse {
        user: UserInfo {
            id: user_id.to_string(),
            email: req.email.clone(),
            name: "演示用户".to_string(),
        },
        token,
        expires_at,
    };

    Ok(Json(ApiResponse::success(resp)))
}

//! 投递回执 API 处理器
//!
//! 供应商回调入口，无认证。回执经模拟队列异步应用，
//! 接口受理后立即返回 202。

use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};
use tracing::debug;
use validator::Validate;

use crm_shared::models::DeliveryStatus;

use crate::{
    dto::{ApiResponse, DeliveryReceiptRequest},
    error::ApiError,
    state::AppState,
};

/// 接收投递回执
///
/// POST /api/delivery/receipt，status 仅接受 SENT / FAILED / PENDING。
pub async fn receive_receipt(
    State(state): State<AppState>,
    Json(req): Json<DeliveryReceiptRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Value>>), ApiError> {
    req.validate()?;

    let status = DeliveryStatus::parse(&req.status)?;
    debug!(log_id = %req.log_id, status = status.as_str(), "收到投递回执");

    state.queue.publish_receipt(
        state.logs.clone(),
        state.campaigns.clone(),
        req.log_id,
        status,
    );

    Ok((
        StatusCode::ACCEPTED,
        Json(ApiResponse::accepted(json!(null), "回执处理已受理")),
    ))
}

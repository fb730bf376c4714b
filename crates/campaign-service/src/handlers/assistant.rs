//! 营销助手 API 处理器
//!
//! 把自然语言描述转为规则建议或文案建议，实现见 assistant 模块。

use axum::{Json, extract::State};
use validator::Validate;

use crate::{
    assistant,
    dto::{ApiResponse, MessagePromptRequest, MessageSuggestion, SegmentPromptRequest,
        SegmentSuggestion},
    error::ApiError,
    state::AppState,
};

/// 根据描述生成分群规则
///
/// POST /api/ai/segment
pub async fn suggest_segment(
    State(_state): State<AppState>,
    Json(req): Json<SegmentPromptRequest>,
) -> Result<Json<ApiResponse<SegmentSuggestion>>, ApiError> {
    req.validate()?;

    let (rules, explanation) = assistant::suggest_rules(&req.prompt);
    Ok(Json(ApiResponse::success(SegmentSuggestion {
        rules,
        explanation,
    })))
}

/// 根据活动目标生成文案建议
///
/// POST /api/ai/message
pub async fn suggest_message(
    State(_state): State<AppState>,
    Json(req): Json<MessagePromptRequest>,
) -> Result<Json<ApiResponse<MessageSuggestion>>, ApiError> {
    let objective = req
        .campaign_objective
        .as_deref()
        .or(req.prompt.as_deref())
        .unwrap_or("")
        .trim()
        .to_string();

    if objective.is_empty() {
        return Err(ApiError::Validation(
            "prompt 或 campaign_objective 至少提供一个".to_string(),
        ));
    }

    let (messages, image_recommendations) = assistant::suggest_messages(&objective);
    Ok(Json(ApiResponse::success(MessageSuggestion {
        messages,
        image_recommendations,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_segment_suggestion_returns_rules() {
        let state = AppState::default();
        let req = SegmentPromptRequest {
            prompt: "流失客户".to_string(),
        };

        let resp = suggest_segment(State(state), Json(req)).await.unwrap();
        let data = resp.0.data.unwrap();
        assert!(!data.rules.is_empty());
        assert!(!data.explanation.is_empty());
    }

    #[tokio::test]
    async fn test_message_requires_objective() {
        let state = AppState::default();
        let req = MessagePromptRequest {
            prompt: None,
            campaign_objective: None,
        };

        assert!(suggest_message(State(state), Json(req)).await.is_err());
    }
}

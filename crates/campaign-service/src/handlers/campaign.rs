//! 营销活动 API 处理器
//!
//! 活动创建时规则树扁平化入库，预览与执行共用分群引擎的同一条
//! 求值路径，保证预览人数与实际收件人数一致。

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::Utc;
use serde_json::{Value, json};
use tracing::{info, warn};
use validator::Validate;

use crm_shared::models::{Campaign, CampaignStatus, CommunicationLog};
use segment_engine::{filter, flatten, preview_size, restore, validate, validate_strict};

use crate::{
    assistant,
    dto::{ApiResponse, CampaignDetail, CreateCampaignRequest, PreviewRequest, PreviewResponse},
    error::ApiError,
    state::AppState,
    worker::DeliverySimulator,
};

/// 获取活动列表
///
/// GET /api/campaigns
pub async fn list_campaigns(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Campaign>>>, ApiError> {
    let mut campaigns = state.campaigns.list();
    campaigns.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(Json(ApiResponse::success(campaigns)))
}

/// 获取活动详情（规则还原为树形）
///
/// GET /api/campaigns/{id}
pub async fn get_campaign(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<CampaignDetail>>, ApiError> {
    let campaign = state
        .campaigns
        .get(&id)
        .ok_or_else(|| ApiError::CampaignNotFound(id.clone()))?;

    let rows = state.campaign_rules.get(&id).unwrap_or_default();
    let rules = restore(&rows)?;

    Ok(Json(ApiResponse::success(CampaignDetail { campaign, rules })))
}

/// 创建活动
///
/// POST /api/campaigns，规则树验证后扁平化存储，活动初始为草稿态。
/// 保存走严格验证，未知字段和未知运算符在入库前报出。
pub async fn create_campaign(
    State(state): State<AppState>,
    Json(req): Json<CreateCampaignRequest>,
) -> Result<Json<ApiResponse<CampaignDetail>>, ApiError> {
    req.validate()?;
    validate_strict(&req.rules)?;

    let mut campaign = Campaign::new(req.name, req.description);
    campaign.audience_size = req.audience_size;
    let id = campaign.id.clone();

    state.campaign_rules.insert(&id, flatten(&req.rules));
    state.campaigns.insert(&id, campaign.clone());

    info!(campaign_id = %id, name = %campaign.name, "活动已创建");

    Ok(Json(ApiResponse::success(CampaignDetail {
        campaign,
        rules: req.rules,
    })))
}

/// 删除活动及其规则与触达日志
///
/// DELETE /api/campaigns/{id}
pub async fn delete_campaign(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    state
        .campaigns
        .remove(&id)
        .ok_or_else(|| ApiError::CampaignNotFound(id.clone()))?;
    state.campaign_rules.remove(&id);

    for log in state.logs.list_by(|log| log.campaign_id == id) {
        state.logs.remove(&log.id);
    }

    info!(campaign_id = %id, "活动已删除");
    Ok(Json(ApiResponse::success_with_message(
        json!({ "id": id }),
        "活动已删除",
    )))
}

/// 受众预览
///
/// POST /api/campaigns/preview，对当前客户快照求命中人数。
pub async fn preview_audience(
    State(state): State<AppState>,
    Json(req): Json<PreviewRequest>,
) -> Result<Json<ApiResponse<PreviewResponse>>, ApiError> {
    validate(&req.rules)?;

    let customers = state.customers.list();
    let size = preview_size(&req.rules, &customers, Utc::now());

    Ok(Json(ApiResponse::success(PreviewResponse { size })))
}

/// 执行活动
///
/// POST /api/campaigns/{id}/execute
///
/// 对客户快照筛选受众，为每个命中客户创建 PENDING 触达日志并
/// 交给投递模拟器；audience_size 以实际命中数覆盖。投递中的
/// 活动拒绝重复执行。
pub async fn execute_campaign(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    let campaign = state
        .campaigns
        .get(&id)
        .ok_or_else(|| ApiError::CampaignNotFound(id.clone()))?;

    if campaign.status == CampaignStatus::Sending {
        return Err(ApiError::InvalidCampaignState(format!(
            "{id} 正在投递中"
        )));
    }

    let rows = state.campaign_rules.get(&id).unwrap_or_default();
    let rules = restore(&rows)?;

    // 客户快照按创建时间排序，受众顺序与重复执行无关
    let mut customers = state.customers.list();
    customers.sort_by(|a, b| a.created_at.cmp(&b.created_at));

    let matched: Vec<_> = filter(&rules, &customers, Utc::now())
        .into_iter()
        .cloned()
        .collect();
    let audience_size = matched.len();

    // 清掉上一轮执行留下的触达日志，统计只覆盖本轮批次
    for log in state.logs.list_by(|log| log.campaign_id == id) {
        state.logs.remove(&log.id);
    }

    state.campaigns.update(&id, |campaign| {
        campaign.audience_size = audience_size;
        campaign.sent_count = 0;
        campaign.failed_count = 0;
        campaign.status = if audience_size == 0 {
            CampaignStatus::Completed
        } else {
            CampaignStatus::Sending
        };
        campaign.updated_at = Utc::now();
    });

    if audience_size == 0 {
        warn!(campaign_id = %id, "受众为空，活动直接完成");
        return Ok(Json(ApiResponse::success_with_message(
            json!({ "audience_size": 0 }),
            "受众为空，活动已完成",
        )));
    }

    let template = assistant::default_campaign_message(&id);
    let batch: Vec<CommunicationLog> = matched
        .iter()
        .map(|customer| {
            let message = assistant::personalize(&template, &customer.name);
            let log = CommunicationLog::pending(id.clone(), customer.id.clone(), message);
            state.logs.insert(&log.id.clone(), log.clone());
            log
        })
        .collect();

    info!(campaign_id = %id, audience_size, "活动开始投递");

    let simulator = DeliverySimulator::new(state.delivery.clone(), state.queue);
    simulator.dispatch(state.logs.clone(), state.campaigns.clone(), batch);

    Ok(Json(ApiResponse::success_with_message(
        json!({ "audience_size": audience_size }),
        "活动投递已启动",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crm_shared::config::DeliveryConfig;
    use crm_shared::models::{Customer, DeliveryStatus};
    use segment_engine::{Operator, Rule, SegmentField};
    use tokio::time::{Duration, sleep};

    use crate::auth::JwtConfig;

    fn fast_state() -> AppState {
        AppState::new(
            JwtConfig::default(),
            DeliveryConfig {
                success_rate: 1.0,
                min_delay_ms: 1,
                max_delay_ms: 5,
            },
        )
    }

    fn seed_customer(state: &AppState, name: &str, total_spend: f64) -> String {
        let mut customer = Customer::new(name, format!("{name}@example.com"), "13800000000");
        customer.total_spend = total_spend;
        let id = customer.id.clone();
        state.customers.insert(&id, customer);
        id
    }

    fn spend_rule(threshold: i64) -> Vec<Rule> {
        vec![Rule::condition(
            SegmentField::TotalSpend,
            Operator::Gt,
            threshold,
        )]
    }

    #[tokio::test]
    async fn test_create_and_get_roundtrip() {
        let state = fast_state();
        let req = CreateCampaignRequest {
            name: "高价值唤回".to_string(),
            description: "".to_string(),
            rules: spend_rule(5000),
            audience_size: 0,
        };

        let created = create_campaign(State(state.clone()), Json(req))
            .await
            .unwrap()
            .0
            .data
            .unwrap();

        let detail = get_campaign(State(state), Path(created.campaign.id.clone()))
            .await
            .unwrap()
            .0
            .data
            .unwrap();
        assert_eq!(detail.campaign.name, "高价值唤回");
        assert_eq!(detail.rules.len(), 1);
        assert_eq!(detail.campaign.status, CampaignStatus::Draft);
    }

    #[tokio::test]
    async fn test_preview_matches_execute_audience() {
        let state = fast_state();
        seed_customer(&state, "a", 8000.0);
        seed_customer(&state, "b", 2000.0);
        seed_customer(&state, "c", 9000.0);

        let preview = preview_audience(
            State(state.clone()),
            Json(PreviewRequest {
                rules: spend_rule(5000),
            }),
        )
        .await
        .unwrap()
        .0
        .data
        .unwrap();
        assert_eq!(preview.size, 2);

        let created = create_campaign(
            State(state.clone()),
            Json(CreateCampaignRequest {
                name: "执行一致性".to_string(),
                description: "".to_string(),
                rules: spend_rule(5000),
                audience_size: preview.size,
            }),
        )
        .await
        .unwrap()
        .0
        .data
        .unwrap();

        let _ = execute_campaign(State(state.clone()), Path(created.campaign.id.clone()))
            .await
            .unwrap();

        let campaign = state.campaigns.get(&created.campaign.id).unwrap();
        assert_eq!(campaign.audience_size, 2);
        assert_eq!(campaign.status, CampaignStatus::Sending);
    }

    #[tokio::test]
    async fn test_execute_empty_audience_completes_immediately() {
        let state = fast_state();
        let created = create_campaign(
            State(state.clone()),
            Json(CreateCampaignRequest {
                name: "空受众".to_string(),
                description: "".to_string(),
                rules: spend_rule(999_999),
                audience_size: 0,
            }),
        )
        .await
        .unwrap()
        .0
        .data
        .unwrap();

        let _ = execute_campaign(State(state.clone()), Path(created.campaign.id.clone()))
            .await
            .unwrap();

        let campaign = state.campaigns.get(&created.campaign.id).unwrap();
        assert_eq!(campaign.status, CampaignStatus::Completed);
        assert_eq!(campaign.audience_size, 0);
    }

    #[tokio::test]
    async fn test_execute_rejects_campaign_in_flight() {
        let state = fast_state();
        seed_customer(&state, "a", 8000.0);

        let created = create_campaign(
            State(state.clone()),
            Json(CreateCampaignRequest {
                name: "重复执行".to_string(),
                description: "".to_string(),
                rules: spend_rule(5000),
                audience_size: 0,
            }),
        )
        .await
        .unwrap()
        .0
        .data
        .unwrap();
        let id = created.campaign.id.clone();

        let _ = execute_campaign(State(state.clone()), Path(id.clone()))
            .await
            .unwrap();
        let err = execute_campaign(State(state.clone()), Path(id))
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CAMPAIGN_STATE");
    }

    #[tokio::test]
    async fn test_reexecution_resets_stats_and_logs() {
        let state = fast_state();
        seed_customer(&state, "a", 8000.0);

        let created = create_campaign(
            State(state.clone()),
            Json(CreateCampaignRequest {
                name: "二次执行".to_string(),
                description: "".to_string(),
                rules: spend_rule(5000),
                audience_size: 0,
            }),
        )
        .await
        .unwrap()
        .0
        .data
        .unwrap();
        let id = created.campaign.id.clone();

        let _ = execute_campaign(State(state.clone()), Path(id.clone()))
            .await
            .unwrap();
        sleep(Duration::from_millis(500)).await;
        assert_eq!(
            state.campaigns.get(&id).unwrap().status,
            CampaignStatus::Completed
        );

        // 已完成的活动允许再次执行，统计与日志都只覆盖本轮
        let _ = execute_campaign(State(state.clone()), Path(id.clone()))
            .await
            .unwrap();
        sleep(Duration::from_millis(500)).await;

        let campaign = state.campaigns.get(&id).unwrap();
        assert_eq!(campaign.audience_size, 1);
        assert_eq!(campaign.sent_count, 1);
        assert_eq!(campaign.failed_count, 0);
        assert_eq!(state.logs.list_by(|log| log.campaign_id == id).len(), 1);
    }

    #[tokio::test]
    async fn test_execution_drives_logs_and_completion() {
        let state = fast_state();
        seed_customer(&state, "a", 8000.0);
        seed_customer(&state, "b", 9000.0);

        let created = create_campaign(
            State(state.clone()),
            Json(CreateCampaignRequest {
                name: "全链路".to_string(),
                description: "".to_string(),
                rules: spend_rule(5000),
                audience_size: 0,
            }),
        )
        .await
        .unwrap()
        .0
        .data
        .unwrap();
        let id = created.campaign.id.clone();

        let _ = execute_campaign(State(state.clone()), Path(id.clone()))
            .await
            .unwrap();

        // 投递延迟 + 队列消费延迟
        sleep(Duration::from_millis(500)).await;

        let campaign = state.campaigns.get(&id).unwrap();
        assert_eq!(campaign.status, CampaignStatus::Completed);
        assert_eq!(campaign.sent_count, 2);

        let logs = state.logs.list_by(|log| log.campaign_id == id);
        assert_eq!(logs.len(), 2);
        assert!(logs.iter().all(|log| log.status == DeliveryStatus::Sent));
        // 文案已个性化，不再包含占位符
        assert!(logs.iter().all(|log| !log.message.contains("{name}")));
    }
}

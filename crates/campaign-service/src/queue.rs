//! 模拟异步入库队列
//!
//! API 层把写操作发布到队列后立即返回 202，消费端延迟少量时间后
//! 落库，模拟生产环境中经消息队列异步持久化的链路。投递回执也
//! 走同一条队列，保证活动统计的更新路径只有一条。

use tokio::time::{Duration, sleep};
use tracing::{debug, info, warn};

use crm_shared::models::{Campaign, CampaignStatus, CommunicationLog, Customer, DeliveryStatus, Order};
use crm_shared::store::MemoryStore;

/// 消费端模拟的入库延迟
const CONSUME_DELAY_MS: u64 = 100;

/// 模拟消息队列
///
/// 无内部状态，`publish_*` 把数据和目标存储一起交给后台任务。
#[derive(Debug, Clone, Copy, Default)]
pub struct MockQueue;

impl MockQueue {
    pub fn new() -> Self {
        Self
    }

    /// 发布客户创建消息，消费端延迟入库
    pub fn publish_customer(&self, customers: MemoryStore<Customer>, customer: Customer) {
        tokio::spawn(async move {
            sleep(Duration::from_millis(CONSUME_DELAY_MS)).await;
            debug!(customer_id = %customer.id, "消费客户创建消息");
            customers.insert(&customer.id.clone(), customer);
        });
    }

    /// 发布订单创建消息
    ///
    /// 消费端入库订单并同步刷新客户的消费统计：
    /// 累计消费、最近购买时间、到店次数。
    pub fn publish_order(
        &self,
        orders: MemoryStore<Order>,
        customers: MemoryStore<Customer>,
        order: Order,
    ) {
        tokio::spawn(async move {
            sleep(Duration::from_millis(CONSUME_DELAY_MS)).await;
            debug!(order_id = %order.id, customer_id = %order.customer_id, "消费订单创建消息");

            let hit = customers.update(&order.customer_id, |customer| {
                customer.total_spend += order.amount;
                if order.order_date > customer.last_purchase_date {
                    customer.last_purchase_date = order.order_date;
                }
                customer.visit_count += 1;
                customer.updated_at = chrono::Utc::now();
            });
            if !hit {
                warn!(customer_id = %order.customer_id, "订单关联的客户不存在，仅入库订单");
            }

            orders.insert(&order.id.clone(), order);
        });
    }

    /// 发布投递回执消息
    pub fn publish_receipt(
        &self,
        logs: MemoryStore<CommunicationLog>,
        campaigns: MemoryStore<Campaign>,
        log_id: String,
        status: DeliveryStatus,
    ) {
        tokio::spawn(async move {
            sleep(Duration::from_millis(CONSUME_DELAY_MS)).await;
            apply_receipt(&logs, &campaigns, &log_id, status);
        });
    }
}

/// 应用单条投递回执
///
/// 更新沟通日志状态并重算活动统计。当活动不再有 PENDING 日志时
/// 标记为已完成。回执对应的日志不存在时仅记录警告。
pub fn apply_receipt(
    logs: &MemoryStore<CommunicationLog>,
    campaigns: &MemoryStore<Campaign>,
    log_id: &str,
    status: DeliveryStatus,
) {
    let Some(log) = logs.get(log_id) else {
        warn!(log_id, "回执对应的沟通日志不存在");
        return;
    };

    logs.update(log_id, |log| {
        log.status = status;
    });

    let campaign_id = log.campaign_id;
    let campaign_logs = logs.list_by(|l| l.campaign_id == campaign_id);
    let sent = campaign_logs
        .iter()
        .filter(|l| l.status == DeliveryStatus::Sent)
        .count();
    let failed = campaign_logs
        .iter()
        .filter(|l| l.status == DeliveryStatus::Failed)
        .count();
    let pending = campaign_logs
        .iter()
        .filter(|l| l.status == DeliveryStatus::Pending)
        .count();

    campaigns.update(&campaign_id, |campaign| {
        campaign.sent_count = sent;
        campaign.failed_count = failed;
        if pending == 0 && campaign.status == CampaignStatus::Sending {
            campaign.status = CampaignStatus::Completed;
            info!(campaign_id = %campaign.id, sent, failed, "活动投递完成");
        }
        campaign.updated_at = chrono::Utc::now();
    });
}

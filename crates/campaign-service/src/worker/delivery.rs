//! 投递模拟器
//!
//! 模拟外部消息供应商：每条待投递日志经过随机延迟后以配置的
//! 成功率产生 SENT / FAILED 回执，回执经模拟队列回写日志与
//! 活动统计，与真实供应商回调走同一条路径。

use rand::Rng;
use tokio::time::{Duration, sleep};
use tracing::{debug, info};

use crm_shared::config::DeliveryConfig;
use crm_shared::models::{Campaign, CommunicationLog, DeliveryStatus};
use crm_shared::store::MemoryStore;

use crate::queue::MockQueue;

/// 投递模拟器
#[derive(Debug, Clone)]
pub struct DeliverySimulator {
    config: DeliveryConfig,
    queue: MockQueue,
}

impl DeliverySimulator {
    pub fn new(config: DeliveryConfig, queue: MockQueue) -> Self {
        Self { config, queue }
    }

    /// 为一批待投递日志启动模拟投递
    ///
    /// 每条日志独立 spawn，互不阻塞。随机数在进入异步等待前
    /// 采样完毕，任务体内不持有 RNG。
    pub fn dispatch(
        &self,
        logs: MemoryStore<CommunicationLog>,
        campaigns: MemoryStore<Campaign>,
        batch: Vec<CommunicationLog>,
    ) {
        info!(count = batch.len(), "开始模拟投递");

        for log in batch {
            let (delay_ms, status) = self.simulate_outcome();
            let queue = self.queue;
            let logs = logs.clone();
            let campaigns = campaigns.clone();

            tokio::spawn(async move {
                sleep(Duration::from_millis(delay_ms)).await;
                debug!(log_id = %log.id, status = status.as_str(), delay_ms, "供应商回执");
                queue.publish_receipt(logs, campaigns, log.id, status);
            });
        }
    }

    /// 采样单条投递的延迟和结果
    ///
    /// 配置值来自外部文件，越界时就地修正而不是 panic：
    /// 成功率收敛到 [0, 1]，延迟区间上下界颠倒时交换。
    fn simulate_outcome(&self) -> (u64, DeliveryStatus) {
        let mut rng = rand::rng();
        let lo = self.config.min_delay_ms.min(self.config.max_delay_ms);
        let hi = self.config.min_delay_ms.max(self.config.max_delay_ms);
        let delay_ms = rng.random_range(lo..=hi);
        let status = if rng.random_bool(self.config.success_rate.clamp(0.0, 1.0)) {
            DeliveryStatus::Sent
        } else {
            DeliveryStatus::Failed
        };
        (delay_ms, status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crm_shared::models::{Campaign, CampaignStatus};

    fn fast_config(success_rate: f64) -> DeliveryConfig {
        DeliveryConfig {
            success_rate,
            min_delay_ms: 1,
            max_delay_ms: 5,
        }
    }

    #[test]
    fn test_outcome_within_configured_delay() {
        let simulator = DeliverySimulator::new(fast_config(0.9), MockQueue::new());
        for _ in 0..100 {
            let (delay, _) = simulator.simulate_outcome();
            assert!((1..=5).contains(&delay));
        }
    }

    #[test]
    fn test_success_rate_extremes() {
        let always = DeliverySimulator::new(fast_config(1.0), MockQueue::new());
        let never = DeliverySimulator::new(fast_config(0.0), MockQueue::new());

        for _ in 0..50 {
            assert_eq!(always.simulate_outcome().1, DeliveryStatus::Sent);
            assert_eq!(never.simulate_outcome().1, DeliveryStatus::Failed);
        }
    }

    #[test]
    fn test_out_of_range_config_does_not_panic() {
        // 成功率越界、延迟上下界颠倒的配置也能正常采样
        let simulator = DeliverySimulator::new(
            DeliveryConfig {
                success_rate: 1.5,
                min_delay_ms: 10,
                max_delay_ms: 2,
            },
            MockQueue::new(),
        );

        for _ in 0..50 {
            let (delay, status) = simulator.simulate_outcome();
            assert!((2..=10).contains(&delay));
            assert_eq!(status, DeliveryStatus::Sent);
        }

        let negative = DeliverySimulator::new(
            DeliveryConfig {
                success_rate: -0.3,
                min_delay_ms: 1,
                max_delay_ms: 1,
            },
            MockQueue::new(),
        );
        assert_eq!(negative.simulate_outcome().1, DeliveryStatus::Failed);
    }

    #[tokio::test]
    async fn test_dispatch_drives_campaign_to_completion() {
        let logs: MemoryStore<CommunicationLog> = MemoryStore::new();
        let campaigns: MemoryStore<Campaign> = MemoryStore::new();

        let mut campaign = Campaign::new("投递测试", "");
        campaign.status = CampaignStatus::Sending;
        campaign.audience_size = 3;
        let campaign_id = campaign.id.clone();
        campaigns.insert(&campaign_id, campaign);

        let batch: Vec<CommunicationLog> = (0..3)
            .map(|i| {
                let log = CommunicationLog::pending(
                    campaign_id.clone(),
                    format!("cust-{i}"),
                    "您好".to_string(),
                );
                logs.insert(&log.id.clone(), log.clone());
                log
            })
            .collect();

        let simulator = DeliverySimulator::new(fast_config(1.0), MockQueue::new());
        simulator.dispatch(logs.clone(), campaigns.clone(), batch);

        // 投递延迟 + 队列消费延迟，留足余量
        sleep(Duration::from_millis(500)).await;

        let updated = campaigns.get(&campaign_id).unwrap();
        assert_eq!(updated.sent_count, 3);
        assert_eq!(updated.failed_count, 0);
        assert_eq!(updated.status, CampaignStatus::Completed);
    }
}

//! 应用全局状态
//!
//! 所有数据驻留内存存储，克隆只复制 Arc 句柄，
//! 多个请求和后台任务共享同一份数据视图。

use crm_shared::config::DeliveryConfig;
use crm_shared::models::{Campaign, CommunicationLog, Customer, Order};
use crm_shared::store::MemoryStore;
use segment_engine::StoredRule;

use crate::auth::{JwtConfig, JwtManager};
use crate::queue::MockQueue;

/// 应用状态
#[derive(Clone)]
pub struct AppState {
    pub customers: MemoryStore<Customer>,
    pub orders: MemoryStore<Order>,
    pub campaigns: MemoryStore<Campaign>,
    pub logs: MemoryStore<CommunicationLog>,
    /// 活动分群规则，按活动 ID 存储扁平行
    pub campaign_rules: MemoryStore<Vec<StoredRule>>,
    pub jwt_manager: JwtManager,
    pub delivery: DeliveryConfig,
    pub queue: MockQueue,
}

impl AppState {
    pub fn new(jwt_config: JwtConfig, delivery: DeliveryConfig) -> Self {
        Self {
            customers: MemoryStore::new(),
            orders: MemoryStore::new(),
            campaigns: MemoryStore::new(),
            logs: MemoryStore::new(),
            campaign_rules: MemoryStore::new(),
            jwt_manager: JwtManager::new(jwt_config),
            delivery,
            queue: MockQueue::new(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(JwtConfig::default(), DeliveryConfig::default())
    }
}

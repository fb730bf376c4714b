//! 营销活动服务
//!
//! 提供客户、订单、活动管理和基于分群规则的受众筛选 REST API，
//! 包含异步入库队列和投递模拟器，数据全部驻留内存。

pub mod assistant;
pub mod auth;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod queue;
pub mod routes;
pub mod seed;
pub mod state;
pub mod worker;

pub use error::ApiError;
pub use state::AppState;

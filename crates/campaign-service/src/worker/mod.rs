//! 后台 Worker 模块

pub mod delivery;

pub use delivery::DeliverySimulator;

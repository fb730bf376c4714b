//! 共享库
//!
//! 包含各服务共用的配置、错误处理、领域模型、内存存储和可观测性基础设施。

pub mod config;
pub mod error;
pub mod models;
pub mod observability;
pub mod store;

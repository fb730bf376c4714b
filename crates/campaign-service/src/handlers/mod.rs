//! API 处理器模块

pub mod assistant;
pub mod auth;
pub mod campaign;
pub mod customer;
pub mod delivery;
pub mod order;

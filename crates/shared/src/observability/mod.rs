//! 统一可观测性模块
//!
//! 提供日志初始化和 HTTP 追踪中间件。所有服务通过单一入口点配置，
//! 确保一致的日志格式和请求关联方式。

pub mod middleware;
pub mod tracing;

use ::tracing::info;
use anyhow::Result;

use crate::config::ObservabilityConfig;

/// 可观测性资源守卫
///
/// 持有日志订阅器的生命周期，Drop 时记录关闭日志。
pub struct ObservabilityGuard {
    _private: (),
}

impl ObservabilityGuard {
    /// 创建一个空的 Guard（用于测试或禁用可观测性时）
    pub fn empty() -> Self {
        Self { _private: () }
    }
}

impl Drop for ObservabilityGuard {
    fn drop(&mut self) {
        info!("Shutting down observability...");
    }
}

/// 统一初始化可观测性
///
/// # Example
///
/// ```ignore
/// use crm_shared::config::AppConfig;
/// use crm_shared::observability;
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let config = AppConfig::load("campaign-service")?;
///     let _guard = observability::init(&config.observability, &config.service_name)?;
///     Ok(())
/// }
/// ```
pub fn init(config: &ObservabilityConfig, service_name: &str) -> Result<ObservabilityGuard> {
    tracing::init(config)?;

    info!(
        service = %service_name,
        log_level = %config.log_level,
        log_format = %config.log_format,
        "Observability initialized"
    );

    Ok(ObservabilityGuard { _private: () })
}

//! 配置管理模块
//!
//! 支持多格式配置文件加载，环境变量覆盖，以及类型安全的配置访问。

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// 服务配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
        }
    }
}

/// 可观测性配置
#[derive(Debug, Clone, Deserialize)]
pub struct ObservabilityConfig {
    pub log_level: String,
    /// 日志输出格式：json（结构化）或 pretty（人类可读）
    pub log_format: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
        }
    }
}

/// 认证配置
///
/// 演示系统的登录是桩实现，但 Token 签发与校验仍走真实的 JWT 流程。
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_expires_secs: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "crm-demo-secret-change-in-production".to_string(),
            jwt_expires_secs: 86400,
        }
    }
}

/// 投递模拟配置
///
/// 控制模拟厂商通道的成功率与回执延迟区间。
#[derive(Debug, Clone, Deserialize)]
pub struct DeliveryConfig {
    /// 模拟发送成功率，取值 0.0 ~ 1.0
    pub success_rate: f64,
    /// 回执延迟下界（毫秒）
    pub min_delay_ms: u64,
    /// 回执延迟上界（毫秒）
    pub max_delay_ms: u64,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            success_rate: 0.9,
            min_delay_ms: 500,
            max_delay_ms: 2500,
        }
    }
}

/// 种子数据配置
#[derive(Debug, Clone, Deserialize)]
pub struct SeedConfig {
    /// 启动时若客户表为空则生成演示数据
    pub enabled: bool,
    pub customer_count: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            customer_count: 50,
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub service_name: String,
    pub environment: String,
    pub server: ServerConfig,
    pub observability: ObservabilityConfig,
    pub auth: AuthConfig,
    pub delivery: DeliveryConfig,
    pub seed: SeedConfig,
}

impl AppConfig {
    /// 从配置文件和环境变量加载配置
    ///
    /// 加载顺序（后加载的会覆盖先加载的同名配置项）：
    /// 1. config/default.toml（默认配置）
    /// 2. config/{environment}.toml（环境特定配置）
    /// 3. 环境变量（CRM_ 前缀，如 CRM_SERVER_PORT -> server.port）
    pub fn load(service_name: &str) -> Result<Self, ConfigError> {
        let env = std::env::var("CRM_ENV").unwrap_or_else(|_| "development".to_string());
        let config_dir = std::env::var("CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

        let builder = Config::builder()
            .set_default("service_name", service_name)?
            .set_default("environment", env.clone())?
            .add_source(File::from(Path::new(&config_dir).join("default.toml")).required(false))
            .add_source(
                File::from(Path::new(&config_dir).join(format!("{}.toml", env))).required(false),
            )
            .add_source(
                Environment::with_prefix("CRM")
                    .separator("_")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// 获取服务地址
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// 是否为生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

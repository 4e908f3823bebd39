//! 配置管理模块
//! 支持从环境变量和配置文件加载配置

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// 应用配置结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub deep_link: DeepLinkConfig,
    pub logging: LoggingConfig,
}

/// DeepLink配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeepLinkConfig {
    /// 链接签名验证密钥（生产环境由部署侧注入，密钥轮换不在本核心范围内）
    pub verification_key: String,
    /// 签名查询参数名
    pub signature_param: String,
    /// 延迟链接cookie名
    pub cookie_name: String,
    /// 延迟链接cookie所在的厂商域名
    pub cookie_domain: String,
    /// 延迟链接有效窗口（毫秒）
    pub deferred_link_ttl_ms: i64,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String, // "json" or "text"
    pub enable_file_logging: bool,
    pub log_file_path: Option<String>,
}

impl Default for DeepLinkConfig {
    fn default() -> Self {
        Self {
            verification_key: std::env::var("DEEP_LINK_VERIFICATION_KEY").unwrap_or_else(|_| {
                "default-link-verification-key-please-change-in-production".to_string()
            }),
            signature_param: std::env::var("DEEP_LINK_SIGNATURE_PARAM")
                .unwrap_or_else(|_| "sig".into()),
            cookie_name: std::env::var("DEEP_LINK_COOKIE_NAME")
                .unwrap_or_else(|_| "deferredDeepLink".into()),
            cookie_domain: std::env::var("DEEP_LINK_COOKIE_DOMAIN")
                .unwrap_or_else(|_| "metamask.io".into()),
            deferred_link_ttl_ms: std::env::var("DEEP_LINK_TTL_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(2 * 60 * 60 * 1000), // 2小时
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            format: std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".into()),
            enable_file_logging: std::env::var("LOG_FILE_ENABLED")
                .ok()
                .map(|v| v == "1")
                .unwrap_or(false),
            log_file_path: std::env::var("LOG_FILE_PATH").ok(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            deep_link: DeepLinkConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// 从环境变量加载配置
    pub fn from_env() -> Result<Self> {
        Ok(Self::default())
    }

    /// 从配置文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        let config: Config =
            toml::from_str(&content).with_context(|| "Failed to parse config file as TOML")?;

        Ok(config)
    }

    /// 从环境变量和配置文件合并加载（配置文件优先级更高）
    pub fn from_env_and_file<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let mut config = Self::from_env()?;

        if let Some(path) = path {
            if path.as_ref().exists() {
                config = Self::from_file(path)?;
            }
        }

        Ok(config)
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<()> {
        if self.deep_link.verification_key.len() < 16 {
            anyhow::bail!("DEEP_LINK_VERIFICATION_KEY must be at least 16 characters");
        }

        if self.deep_link.signature_param.is_empty() {
            anyhow::bail!("DEEP_LINK_SIGNATURE_PARAM must not be empty");
        }

        if self.deep_link.deferred_link_ttl_ms <= 0 {
            anyhow::bail!("DEEP_LINK_TTL_MS must be positive");
        }

        // 验证日志级别
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            anyhow::bail!("LOG_LEVEL must be one of: {:?}", valid_levels);
        }

        // 验证日志格式
        if self.logging.format != "json" && self.logging.format != "text" {
            anyhow::bail!("LOG_FORMAT must be 'json' or 'text'");
        }

        Ok(())
    }
}

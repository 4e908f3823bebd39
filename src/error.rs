//! 错误类型定义模块
//!
//! DeepLink核心的错误分类：参数错误、格式错误、路由未匹配、持久化状态损坏

use thiserror::Error;

/// DeepLink核心错误类型
///
/// 仅CAIP解析器和路由handler允许向内部传播错误；
/// 所有公开入口（parse / get_deferred_deep_link_*）均为全函数，
/// 在边界处统一转为日志 + None，绝不向调用方抛出。
#[derive(Debug, Error)]
pub enum DeepLinkError {
    /// 必需的查询参数缺失
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    /// 参数格式非法（如CAIP标识符不符合语法）
    #[error("Invalid parameter format: {0}")]
    InvalidParameterFormat(String),

    /// 无匹配路由
    #[error("No matching route for path: {0}")]
    NoMatchingRoute(String),

    /// 持久化状态损坏（cookie JSON格式或字段非法）
    #[error("Malformed persisted state: {0}")]
    MalformedPersistedState(String),
}

impl DeepLinkError {
    /// 稳定的错误码（snake_case，用于日志与监控聚合）
    pub fn code(&self) -> &'static str {
        match self {
            DeepLinkError::MissingParameter(_) => "missing_parameter",
            DeepLinkError::InvalidParameterFormat(_) => "invalid_parameter_format",
            DeepLinkError::NoMatchingRoute(_) => "no_matching_route",
            DeepLinkError::MalformedPersistedState(_) => "malformed_persisted_state",
        }
    }
}

/// DeepLink核心统一Result别名
pub type Result<T> = std::result::Result<T, DeepLinkError>;

//! IronLink - 钱包DeepLink路由与信任验证核心
//!
//! 将外部传入的URL解析为具体的应用内/外部目的地，
//! 以密码学手段区分厂商真实签发的链接与猜测/篡改的链接，
//! 并跨onboarding边界承接时间受限的延迟链接

pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod security;
pub mod service;
pub mod utils;

// 重新导出常用类型
pub use error::{DeepLinkError, Result};

// 统一模块导出
pub mod prelude {
    pub use crate::{
        config::{Config, DeepLinkConfig},
        domain::{
            CaipAssetId, CaipChainId, DeferredDeepLink, DeferredDeepLinkRoute, Destination,
            ParsedDeepLink, SignatureStatus,
        },
        error::{DeepLinkError, Result},
        infrastructure::cookie_store::{CookieStore, Navigator},
        security::LinkVerifier,
        service::{DeepLinkParser, DeferredDeepLinkManager},
    };
}

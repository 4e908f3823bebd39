//! 延迟DeepLink管理模块
//!
//! 跨冷启动/onboarding边界持久化的单条待处理链接的生命周期：
//! 读取厂商域cookie → 有效期校验 → 解析 → 三种面向用户的路由决策之一
//!
//! 决策状态机（全部终态在单次同步等价遍历内到达，无重试、无部分进度）：
//! ```text
//! Start → {Expired|Absent} → None
//!       → Parsed → Redirect目的地 → Redirect
//!       → Parsed → Navigate目的地 → {Valid → Navigate, 非Valid → Interstitial}
//!       → ParseFailure → None
//! ```

use std::sync::Arc;

use chrono::Utc;
use url::Url;

use crate::config::DeepLinkConfig;
use crate::domain::{DeferredDeepLink, DeferredDeepLinkRoute, Destination};
use crate::infrastructure::cookie_store::{CookieStore, Navigator};
use crate::service::deep_link_parser::DeepLinkParser;
use crate::service::routes;
use crate::utils::url_utils::path_and_query;

/// 延迟DeepLink管理器
///
/// 调用方须保证每次冷启动至多调用一次路由决策；本核心不提供互斥
pub struct DeferredDeepLinkManager {
    parser: DeepLinkParser,
    cookie_store: Arc<dyn CookieStore>,
    cookie_name: String,
    cookie_domain: String,
    ttl_ms: i64,
}

impl DeferredDeepLinkManager {
    /// 从配置与cookie存储协作方创建管理器
    pub fn new(config: &DeepLinkConfig, cookie_store: Arc<dyn CookieStore>) -> Self {
        Self {
            parser: DeepLinkParser::new(config),
            cookie_store,
            cookie_name: config.cookie_name.clone(),
            cookie_domain: config.cookie_domain.clone(),
            ttl_ms: config.deferred_link_ttl_ms,
        }
    }

    /// 从cookie读取延迟DeepLink
    ///
    /// cookie缺失 ⇒ None；JSON或字段形状非法 ⇒ 记一条错误日志并返回None，绝不抛出
    pub async fn get_deferred_deep_link_from_cookie(&self) -> Option<DeferredDeepLink> {
        let record = self
            .cookie_store
            .get(&self.cookie_domain, &self.cookie_name)
            .await?;

        match serde_json::from_str::<DeferredDeepLink>(&record.value) {
            Ok(link) => Some(link),
            Err(err) => {
                tracing::error!(
                    code = "malformed_persisted_state",
                    cookie = self.cookie_name.as_str(),
                    "Failed to parse deferred deep link cookie: {}",
                    err
                );
                None
            }
        }
    }

    /// 将延迟DeepLink转为面向用户的路由决策
    ///
    /// 全函数：任何内部失败均记日志并收敛为None，绝不使调用方崩溃
    pub fn get_deferred_deep_link_route(
        &self,
        deferred_deep_link: Option<&DeferredDeepLink>,
    ) -> Option<DeferredDeepLinkRoute> {
        let link = deferred_deep_link?;
        if link.referring_link.is_empty() {
            return None;
        }

        // 过期检查先于一切解析与密码学工作：过期链接与不存在的链接不可区分
        let age_ms = Utc::now().timestamp_millis() - link.created_at;
        if age_ms > self.ttl_ms {
            tracing::debug!(age_ms, "Deferred deep link expired, dropping");
            return None;
        }

        let url = match Url::parse(&link.referring_link) {
            Ok(url) => url,
            Err(err) => {
                tracing::warn!(
                    referring_link = link.referring_link.as_str(),
                    "Failed to parse deferred deep link url: {}",
                    err
                );
                return None;
            }
        };

        let parsed = self.parser.parse(&url)?;

        match parsed.destination {
            // 外部重定向不经过应用内签名门禁：它不会触及内部可信路由
            Destination::Redirect { url } => Some(DeferredDeepLinkRoute::Redirect { url }),
            destination @ Destination::Navigate { .. } => {
                if !parsed.signature.is_trusted() {
                    // 插页携带原始传入path+query，而非解析后的应用内路径：
                    // 警告必须先于对解析结果的信任
                    return Some(DeferredDeepLinkRoute::Interstitial {
                        url_path_and_query: path_and_query(&url),
                    });
                }

                let route = destination.navigation_target()?;
                Some(DeferredDeepLinkRoute::Navigate {
                    route,
                    signature: parsed.signature,
                })
            }
        }
    }

    /// 冷启动粘合：读取cookie → 求路由决策 → 驱动导航协作方
    ///
    /// 返回决策本身供UI层记录；调用方保证每次冷启动至多调用一次
    pub async fn handle_cold_start(
        &self,
        navigator: &dyn Navigator,
    ) -> Option<DeferredDeepLinkRoute> {
        let link = self.get_deferred_deep_link_from_cookie().await;
        let decision = self.get_deferred_deep_link_route(link.as_ref());

        match &decision {
            Some(DeferredDeepLinkRoute::Redirect { url }) => navigator.redirect(url),
            Some(DeferredDeepLinkRoute::Navigate { route, .. }) => navigator.navigate(route),
            Some(DeferredDeepLinkRoute::Interstitial { url_path_and_query }) => {
                navigator.navigate(&routes::interstitial_target(url_path_and_query))
            }
            None => {}
        }

        decision
    }
}

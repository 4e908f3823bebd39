//! Cookie存储抽象模块
//!
//! 宿主浏览器cookie jar的访问抽象：延迟DeepLink读取的唯一异步挂起点
//! 本核心不设超时上界，调用方应自行包裹超时/取消

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

/// 一条cookie记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieRecord {
    pub domain: String,
    pub name: String,
    pub value: String,
    /// 过期时刻（epoch毫秒），None为会话cookie
    pub expiration_ms: Option<i64>,
}

/// 外部cookie存储协作方接口
#[async_trait]
pub trait CookieStore: Send + Sync {
    /// 按域名和cookie名读取，不存在返回None
    async fn get(&self, domain: &str, name: &str) -> Option<CookieRecord>;

    /// 写入一条cookie（覆盖同域同名）
    async fn set(&self, record: CookieRecord);
}

/// 应用内导航协作方接口
pub trait Navigator: Send + Sync {
    /// 应用内导航（path+query）
    fn navigate(&self, path_and_query: &str);

    /// 跳出应用的外部重定向
    fn redirect(&self, url: &str);
}

/// 内存cookie存储（测试与无浏览器环境下的降级实现）
#[derive(Default)]
pub struct MemoryCookieStore {
    cookies: RwLock<HashMap<(String, String), CookieRecord>>,
}

impl MemoryCookieStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CookieStore for MemoryCookieStore {
    async fn get(&self, domain: &str, name: &str) -> Option<CookieRecord> {
        self.cookies
            .read()
            .await
            .get(&(domain.to_string(), name.to_string()))
            .cloned()
    }

    async fn set(&self, record: CookieRecord) {
        self.cookies
            .write()
            .await
            .insert((record.domain.clone(), record.name.clone()), record);
    }
}

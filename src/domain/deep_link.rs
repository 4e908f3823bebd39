//! DeepLink领域模型模块
//!
//! 目的地、签名状态、解析结果与延迟链接的核心类型定义

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

/// 查询参数：有序键值对集合
///
/// 保持插入顺序，保证序列化结果确定（同样输入 ⇒ 完全相同的输出字符串）
pub type QueryParams = Vec<(String, String)>;

/// 将查询参数序列化为query字符串（不含`?`前缀）
///
/// 按插入顺序编码，结果可用于日志、比较与测试
pub fn serialize_query(params: &QueryParams) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in params {
        serializer.append_pair(key, value);
    }
    serializer.finish()
}

/// 解析目的地
///
/// 显式的和类型：消费方必须按判别子分支处理，不允许按字段存在性判断
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Destination {
    /// 跳出应用的外部重定向
    Redirect {
        /// 外部绝对URL
        url: String,
    },
    /// 应用内导航
    Navigate {
        /// 应用内路径
        path: String,
        /// 有序查询参数
        query: QueryParams,
    },
}

impl Destination {
    /// 应用内导航目的地的完整path+query字符串
    ///
    /// query为空时仅返回path，不带悬空的`?`
    pub fn navigation_target(&self) -> Option<String> {
        match self {
            Destination::Redirect { .. } => None,
            Destination::Navigate { path, query } => {
                if query.is_empty() {
                    Some(path.clone())
                } else {
                    Some(format!("{}?{}", path, serialize_query(query)))
                }
            }
        }
    }
}

/// 链接签名状态
///
/// `Valid`为唯一可信状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignatureStatus {
    Valid,
    Invalid,
    Missing,
}

impl SignatureStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignatureStatus::Valid => "valid",
            SignatureStatus::Invalid => "invalid",
            SignatureStatus::Missing => "missing",
        }
    }

    /// 是否为可信状态
    pub fn is_trusted(&self) -> bool {
        matches!(self, SignatureStatus::Valid)
    }
}

/// 单次URL解析的结果（每次parse调用新建，不持久化）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDeepLink {
    pub destination: Destination,
    pub signature: SignatureStatus,
}

/// 延迟DeepLink
///
/// 由外部在首触时写入cookie（JSON格式），onboarding完成后由管理器读取一次；
/// 本核心不负责删除，覆盖/清理策略属于外部cookie存储
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeferredDeepLink {
    /// 写入时刻（epoch毫秒）
    pub created_at: i64,
    /// 原始引荐链接（绝对URL字符串）
    pub referring_link: String,
}

/// 延迟DeepLink的最终路由决策（UI层据此行动）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeferredDeepLinkRoute {
    /// 外部重定向（不经过应用内签名门禁）
    Redirect { url: String },
    /// 已验证的应用内导航
    Navigate {
        /// 解析后的应用内path（query非空时已附加）
        route: String,
        signature: SignatureStatus,
    },
    /// 警告插页：签名不可信的应用内导航
    Interstitial {
        /// 原始传入链接的path+query（非解析后的应用内路径）
        url_path_and_query: String,
    },
}

//! DeepLink解析编排模块
//!
//! 应用侧解析外部URL的唯一集成点：
//! 路由匹配 → handler求目的地 → 独立的签名分类 → 合并为单一解析结果
//!
//! 对任意（可能恶意的）输入安全：handler失败记日志并返回None，绝不向外抛出

use url::Url;

use crate::config::DeepLinkConfig;
use crate::domain::ParsedDeepLink;
use crate::security::LinkVerifier;
use crate::service::routes;
use crate::utils::url_utils::query_pairs_without;

/// DeepLink解析编排器
pub struct DeepLinkParser {
    verifier: LinkVerifier,
    signature_param: String,
}

impl DeepLinkParser {
    /// 从配置创建编排器
    pub fn new(config: &DeepLinkConfig) -> Self {
        Self {
            verifier: LinkVerifier::new(config),
            signature_param: config.signature_param.clone(),
        }
    }

    /// 使用注入的验证器创建编排器（测试替换密钥用）
    pub fn with_verifier(verifier: LinkVerifier, signature_param: impl Into<String>) -> Self {
        Self {
            verifier,
            signature_param: signature_param.into(),
        }
    }

    /// 解析一条外部URL
    ///
    /// - 路径无匹配路由 ⇒ None
    /// - handler失败 ⇒ 记日志，None
    /// - 否则返回目的地 + 对完整原始URL独立求出的签名状态
    pub fn parse(&self, url: &Url) -> Option<ParsedDeepLink> {
        let route = routes::match_route(url.path())?;

        // 签名参数是路由元数据，不进入handler视野
        let params = query_pairs_without(url, &self.signature_param);

        let destination = match (route.handler)(&params) {
            Ok(destination) => destination,
            Err(err) => {
                tracing::warn!(
                    code = err.code(),
                    path = url.path(),
                    "Deep link handler failed: {}",
                    err
                );
                return None;
            }
        };

        let signature = self.verifier.verify(url);

        Some(ParsedDeepLink {
            destination,
            signature,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Destination, SignatureStatus};

    fn test_parser() -> DeepLinkParser {
        let verifier = LinkVerifier::with_key("test_link_verification_key", "sig");
        DeepLinkParser::with_verifier(verifier, "sig")
    }

    fn sign(url: &mut Url) {
        let verifier = LinkVerifier::with_key("test_link_verification_key", "sig");
        let sig = verifier.sign(url).unwrap();
        url.query_pairs_mut().append_pair("sig", &sig);
    }

    #[test]
    fn test_parse_unknown_route_is_none() {
        let url = Url::parse("https://metamask.io/nowhere?x=1").unwrap();
        assert!(test_parser().parse(&url).is_none());
    }

    #[test]
    fn test_parse_handler_failure_is_none() {
        // assetId缺失：handler失败不外抛
        let url = Url::parse("https://metamask.io/asset").unwrap();
        assert!(test_parser().parse(&url).is_none());

        let url = Url::parse("https://metamask.io/asset?assetId=not-caip-asset-id").unwrap();
        assert!(test_parser().parse(&url).is_none());
    }

    #[test]
    fn test_parse_unsigned_link() {
        let url = Url::parse("https://metamask.io/asset?assetId=eip155:1/slip44:60").unwrap();
        let parsed = test_parser().parse(&url).unwrap();
        assert_eq!(parsed.signature, SignatureStatus::Missing);
        assert_eq!(
            parsed.destination,
            Destination::Navigate {
                path: "/asset/0x1".into(),
                query: vec![],
            }
        );
    }

    #[test]
    fn test_parse_signed_link() {
        let mut url = Url::parse("https://metamask.io/asset?assetId=eip155:1/slip44:60").unwrap();
        sign(&mut url);
        let parsed = test_parser().parse(&url).unwrap();
        assert_eq!(parsed.signature, SignatureStatus::Valid);
    }

    #[test]
    fn test_signature_param_hidden_from_handler() {
        // nft handler忽略参数，但swap handler透传参数：sig不得出现
        let mut url = Url::parse("https://metamask.io/swap?from=eth&to=usdc").unwrap();
        sign(&mut url);
        let parsed = test_parser().parse(&url).unwrap();
        assert_eq!(
            parsed.destination,
            Destination::Navigate {
                path: "/swaps".into(),
                query: vec![
                    ("from".into(), "eth".into()),
                    ("to".into(), "usdc".into())
                ],
            }
        );
    }

    #[test]
    fn test_parse_is_deterministic() {
        let url = Url::parse("https://metamask.io/asset?assetId=eip155:1/slip44:60").unwrap();
        let parser = test_parser();
        let first = parser.parse(&url).unwrap();
        let second = parser.parse(&url).unwrap();
        assert_eq!(first, second);
    }
}

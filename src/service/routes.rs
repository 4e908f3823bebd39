//! 路由注册表模块
//!
//! 编译期固定的路由描述符表：pathname ⇒ 标题key + 目的地handler
//! 进程启动后不可变，首次访问时断言pathname全局唯一

use std::collections::HashSet;

use once_cell::sync::Lazy;
use url::Url;

use crate::domain::{CaipAssetId, Destination, QueryParams};
use crate::error::{DeepLinkError, Result};
use crate::utils::url_utils::{decimal_to_hex_chain_id, encode_path_segment};

/// 警告插页的应用内路径
pub const INTERSTITIAL_PATH: &str = "/link";

/// 警告插页的查询参数名（值为百分号编码的原始path+query）
pub const INTERSTITIAL_PARAM: &str = "u";

/// predict外部重定向的目标主机（部署侧可通过环境变量覆盖）
static PREDICT_BASE_URL: Lazy<String> = Lazy::new(|| {
    std::env::var("DEEP_LINK_PREDICT_BASE_URL")
        .unwrap_or_else(|_| "https://predict.metamask.io".into())
});

/// 路由定义
///
/// 进程启动时构造，注册后不可变
pub struct Route {
    /// URL路径（注册表内全局唯一）
    pub pathname: &'static str,
    /// 标题解析器，返回本地化字符串key
    pub title: fn(&QueryParams) -> &'static str,
    /// 目的地handler，接收已剔除签名参数的查询参数
    pub handler: fn(&QueryParams) -> Result<Destination>,
}

/// 路由注册表（静态初始化，匹配顺序即声明顺序）
pub static ROUTE_REGISTRY: Lazy<Vec<Route>> = Lazy::new(|| {
    let routes = vec![
        Route {
            pathname: "/asset",
            title: |_| "deep_link_asset_title",
            handler: handle_asset,
        },
        Route {
            pathname: "/nft",
            title: |_| "deep_link_nft_title",
            handler: handle_nft,
        },
        Route {
            pathname: "/predict",
            title: |_| "deep_link_predict_title",
            handler: handle_predict,
        },
        Route {
            pathname: "/home",
            title: |_| "deep_link_home_title",
            handler: handle_home,
        },
        Route {
            pathname: "/swap",
            title: |_| "deep_link_swap_title",
            handler: handle_swap,
        },
    ];

    // 启动期断言：pathname全局唯一
    let mut seen = HashSet::new();
    for route in &routes {
        assert!(
            seen.insert(route.pathname),
            "Duplicate route pathname: {}",
            route.pathname
        );
    }

    routes
});

/// 按路径精确匹配路由（剥除单个尾部斜杠后比较）
///
/// 无匹配返回None，绝不落入默认路由
pub fn match_route(path: &str) -> Option<&'static Route> {
    let normalized = if path.len() > 1 {
        path.strip_suffix('/').unwrap_or(path)
    } else {
        path
    };
    ROUTE_REGISTRY.iter().find(|r| r.pathname == normalized)
}

/// 构建警告插页的应用内导航目标: `/link?u=<百分号编码的原始path+query>`
pub fn interstitial_target(original_path_and_query: &str) -> String {
    format!(
        "{}?{}={}",
        INTERSTITIAL_PATH,
        INTERSTITIAL_PARAM,
        encode_path_segment(original_path_and_query)
    )
}

/// 读取首个同名查询参数
fn get_param<'a>(params: &'a QueryParams, name: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

/// `/asset`路由handler
///
/// 按CAIP-19资产标识符分类：
/// - EVM原生资产（slip44）⇒ `/asset/{hexChainId}`
/// - EVM合约资产 ⇒ `/asset/{hexChainId}/{assetReference}`（地址不做大小写转换）
/// - 非EVM资产 ⇒ `/asset/{caipChainId}/{百分号编码的原始assetId}`
fn handle_asset(params: &QueryParams) -> Result<Destination> {
    let asset_id =
        get_param(params, "assetId").ok_or(DeepLinkError::MissingParameter("assetId"))?;

    let asset = CaipAssetId::parse(asset_id)?;

    let path = if asset.is_evm() {
        let hex_chain_id = decimal_to_hex_chain_id(&asset.chain.reference)?;
        if asset.is_native_asset() {
            format!("/asset/{}", hex_chain_id)
        } else {
            format!("/asset/{}/{}", hex_chain_id, asset.asset_reference)
        }
    } else {
        format!(
            "/asset/{}/{}",
            asset.chain,
            encode_path_segment(asset_id)
        )
    };

    Ok(Destination::Navigate {
        path,
        query: vec![],
    })
}

/// `/nft`路由handler：静态映射到首页NFT标签
fn handle_nft(_params: &QueryParams) -> Result<Destination> {
    Ok(Destination::Navigate {
        path: "/home".into(),
        query: vec![("tab".into(), "nfts".into())],
    })
}

/// `/predict`路由handler：外部重定向，透传全部查询参数（保持顺序）
fn handle_predict(params: &QueryParams) -> Result<Destination> {
    let mut url = Url::parse(&PREDICT_BASE_URL).map_err(|err| {
        DeepLinkError::InvalidParameterFormat(format!("Invalid predict base url: {}", err))
    })?;

    if !params.is_empty() {
        url.query_pairs_mut().extend_pairs(params.iter());
    }

    Ok(Destination::Redirect {
        url: url.to_string(),
    })
}

/// `/home`路由handler：静态映射到首页
fn handle_home(_params: &QueryParams) -> Result<Destination> {
    Ok(Destination::Navigate {
        path: "/home".into(),
        query: vec![],
    })
}

/// `/swap`路由handler：透传from/to/amount参数到应用内兑换页
fn handle_swap(params: &QueryParams) -> Result<Destination> {
    let query: QueryParams = params
        .iter()
        .filter(|(key, _)| matches!(key.as_str(), "from" | "to" | "amount"))
        .cloned()
        .collect();

    Ok(Destination::Navigate {
        path: "/swaps".into(),
        query,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_pathnames_unique() {
        let mut seen = HashSet::new();
        for route in ROUTE_REGISTRY.iter() {
            assert!(seen.insert(route.pathname));
        }
    }

    #[test]
    fn test_match_route() {
        assert!(match_route("/asset").is_some());
        assert!(match_route("/asset/").is_some());
        assert!(match_route("/nft").is_some());
        assert!(match_route("/unknown").is_none());
        assert!(match_route("/").is_none());
    }

    #[test]
    fn test_route_titles() {
        let route = match_route("/asset").unwrap();
        assert_eq!((route.title)(&vec![]), "deep_link_asset_title");
    }

    #[test]
    fn test_asset_evm_native() {
        let params = vec![("assetId".to_string(), "eip155:1/slip44:60".to_string())];
        let dest = handle_asset(&params).unwrap();
        assert_eq!(
            dest,
            Destination::Navigate {
                path: "/asset/0x1".into(),
                query: vec![],
            }
        );
    }

    #[test]
    fn test_asset_evm_contract_keeps_address_case() {
        let params = vec![(
            "assetId".to_string(),
            "eip155:137/erc20:0x2791Bca1f2de4661ED88A30C99A7a9449Aa84174".to_string(),
        )];
        let dest = handle_asset(&params).unwrap();
        assert_eq!(
            dest,
            Destination::Navigate {
                path: "/asset/0x89/0x2791Bca1f2de4661ED88A30C99A7a9449Aa84174".into(),
                query: vec![],
            }
        );
    }

    #[test]
    fn test_asset_non_evm_percent_encodes_original_id() {
        let asset_id = "solana:5eykt4UsFv8P8NJdTREpY1vzqKqZKvdp/token:EPjFW";
        let params = vec![("assetId".to_string(), asset_id.to_string())];
        let dest = handle_asset(&params).unwrap();

        match dest {
            Destination::Navigate { path, query } => {
                assert!(query.is_empty());
                let prefix = "/asset/solana:5eykt4UsFv8P8NJdTREpY1vzqKqZKvdp/";
                assert!(path.starts_with(prefix), "unexpected path: {}", path);
                let encoded = &path[prefix.len()..];
                let decoded = percent_encoding::percent_decode_str(encoded)
                    .decode_utf8()
                    .unwrap();
                assert_eq!(decoded, asset_id);
            }
            other => panic!("expected Navigate, got {:?}", other),
        }
    }

    #[test]
    fn test_asset_missing_parameter() {
        let err = handle_asset(&vec![]).unwrap_err();
        assert_eq!(err.code(), "missing_parameter");
    }

    #[test]
    fn test_asset_invalid_parameter() {
        let params = vec![("assetId".to_string(), "not-caip-asset-id".to_string())];
        let err = handle_asset(&params).unwrap_err();
        assert_eq!(err.code(), "invalid_parameter_format");
    }

    #[test]
    fn test_nft_static_mapping() {
        let dest = handle_nft(&vec![]).unwrap();
        assert_eq!(
            dest,
            Destination::Navigate {
                path: "/home".into(),
                query: vec![("tab".into(), "nfts".into())],
            }
        );
    }

    #[test]
    fn test_predict_forwards_params_in_order() {
        let params = vec![
            ("market".to_string(), "btc-usd".to_string()),
            ("ref".to_string(), "campaign7".to_string()),
        ];
        let dest = handle_predict(&params).unwrap();
        match dest {
            Destination::Redirect { url } => {
                assert!(url.starts_with("https://predict.metamask.io/"));
                assert!(url.contains("market=btc-usd&ref=campaign7"));
            }
            other => panic!("expected Redirect, got {:?}", other),
        }
    }

    #[test]
    fn test_predict_without_params() {
        let dest = handle_predict(&vec![]).unwrap();
        match dest {
            Destination::Redirect { url } => {
                assert!(url.starts_with("https://predict.metamask.io/"));
                assert!(!url.contains('?'));
            }
            other => panic!("expected Redirect, got {:?}", other),
        }
    }

    #[test]
    fn test_swap_filters_parameters() {
        let params = vec![
            ("from".to_string(), "eth".to_string()),
            ("sig".to_string(), "should-not-survive".to_string()),
            ("to".to_string(), "usdc".to_string()),
        ];
        let dest = handle_swap(&params).unwrap();
        assert_eq!(
            dest,
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
    fn test_interstitial_target_encoding() {
        let target = interstitial_target("/asset?assetId=eip155:1/slip44:60&sig=abc");
        assert!(target.starts_with("/link?u="));
        let encoded = target.strip_prefix("/link?u=").unwrap();
        let decoded = percent_encoding::percent_decode_str(encoded)
            .decode_utf8()
            .unwrap();
        assert_eq!(decoded, "/asset?assetId=eip155:1/slip44:60&sig=abc");
    }
}

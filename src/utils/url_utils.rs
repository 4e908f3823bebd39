//! URL工具模块
//! 提供path+query提取、链ID进制转换与百分号编码等工具函数

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use url::Url;

use crate::domain::QueryParams;
use crate::error::{DeepLinkError, Result};

/// 路径段编码集：保留非保留字符（RFC 3986 unreserved）
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// 提取URL的path+query部分
///
/// 无query时仅返回path，不带悬空的`?`
pub fn path_and_query(url: &Url) -> String {
    match url.query() {
        Some(query) if !query.is_empty() => format!("{}?{}", url.path(), query),
        _ => url.path().to_string(),
    }
}

/// 提取URL的查询参数为有序键值对，排除指定参数名
///
/// 顺序与URL中出现的顺序一致
pub fn query_pairs_without(url: &Url, excluded: &str) -> QueryParams {
    url.query_pairs()
        .filter(|(key, _)| key != excluded)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect()
}

/// 十进制链引用转`0x`前缀十六进制链ID
///
/// 转换必须精确：`"1"` ⇒ `"0x1"`，`"137"` ⇒ `"0x89"`；
/// 非十进制输入返回`InvalidParameterFormat`
pub fn decimal_to_hex_chain_id(decimal: &str) -> Result<String> {
    let value: u128 = decimal.parse().map_err(|_| {
        DeepLinkError::InvalidParameterFormat(format!("Invalid decimal chain id: {}", decimal))
    })?;
    Ok(format!("0x{:x}", value))
}

/// 将字符串百分号编码为单个路径段
///
/// 编码后解码必须严格还原原始字符串
pub fn encode_path_segment(s: &str) -> String {
    utf8_percent_encode(s, PATH_SEGMENT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_and_query() {
        let url = Url::parse("https://metamask.io/asset?assetId=eip155:1/slip44:60").unwrap();
        assert_eq!(path_and_query(&url), "/asset?assetId=eip155:1/slip44:60");

        let bare = Url::parse("https://metamask.io/home").unwrap();
        assert_eq!(path_and_query(&bare), "/home");
    }

    #[test]
    fn test_query_pairs_without_excludes_signature() {
        let url = Url::parse("https://metamask.io/asset?assetId=abc&sig=deadbeef&b=2").unwrap();
        let pairs = query_pairs_without(&url, "sig");
        assert_eq!(
            pairs,
            vec![
                ("assetId".to_string(), "abc".to_string()),
                ("b".to_string(), "2".to_string())
            ]
        );
    }

    #[test]
    fn test_decimal_to_hex_chain_id() {
        assert_eq!(decimal_to_hex_chain_id("1").unwrap(), "0x1");
        assert_eq!(decimal_to_hex_chain_id("56").unwrap(), "0x38");
        assert_eq!(decimal_to_hex_chain_id("137").unwrap(), "0x89");
        assert_eq!(decimal_to_hex_chain_id("42161").unwrap(), "0xa4b1");
    }

    #[test]
    fn test_decimal_to_hex_chain_id_invalid() {
        assert!(decimal_to_hex_chain_id("0x1").is_err());
        assert!(decimal_to_hex_chain_id("abc").is_err());
        assert!(decimal_to_hex_chain_id("").is_err());
        assert!(decimal_to_hex_chain_id("-5").is_err());
    }

    #[test]
    fn test_encode_path_segment_roundtrip() {
        let original = "solana:5eykt4UsFv8P8NJdTREpY1vzqKqZKvdp/token:EPjFW";
        let encoded = encode_path_segment(original);
        assert!(!encoded.contains('/'));
        assert!(!encoded.contains(':'));
        let decoded = percent_encoding::percent_decode_str(&encoded)
            .decode_utf8()
            .unwrap();
        assert_eq!(decoded, original);
    }
}

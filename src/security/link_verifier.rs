//! 链接签名验证模块
//!
//! 区分厂商真实签发的链接与伪造/篡改的链接：
//! 对去除签名参数后的规范URL计算HMAC-SHA256，常量时间比较
//!
//! 验证失败一律收敛为`Invalid`（fail-closed），绝不向调用方抛出异常

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use url::{form_urlencoded, Url};

use crate::config::DeepLinkConfig;
use crate::domain::SignatureStatus;

type HmacSha256 = Hmac<Sha256>;

/// 链接签名验证器
///
/// 验证密钥通过构造函数注入（而非模块级单例），便于测试替换
pub struct LinkVerifier {
    key: String,
    signature_param: String,
}

impl LinkVerifier {
    /// 从配置创建验证器
    pub fn new(config: &DeepLinkConfig) -> Self {
        Self {
            key: config.verification_key.clone(),
            signature_param: config.signature_param.clone(),
        }
    }

    /// 从显式密钥创建验证器
    pub fn with_key(key: impl Into<String>, signature_param: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            signature_param: signature_param.into(),
        }
    }

    /// 分类URL的签名状态
    ///
    /// - 签名参数缺失 ⇒ `Missing`
    /// - 重算签名匹配 ⇒ `Valid`
    /// - 其余情况（不匹配、签名编码损坏、密钥异常）⇒ `Invalid`
    pub fn verify(&self, url: &Url) -> SignatureStatus {
        let presented = match self.extract_signature(url) {
            Some(value) => value,
            None => return SignatureStatus::Missing,
        };

        let expected = match self.compute_signature_bytes(url) {
            Some(bytes) => bytes,
            None => return SignatureStatus::Invalid,
        };

        // 签名hex解码失败视为Invalid，不作为错误传播
        let presented_bytes = match hex::decode(presented.as_bytes()) {
            Ok(bytes) => bytes,
            Err(_) => return SignatureStatus::Invalid,
        };

        // 常量时间比较，防止时序攻击泄露失配字节位置
        if bool::from(expected.ct_eq(&presented_bytes)) {
            SignatureStatus::Valid
        } else {
            SignatureStatus::Invalid
        }
    }

    /// 对URL签名，返回应填入签名参数的hex值
    ///
    /// 供测试与厂商链接签发工具使用；与verify采用同一规范化
    pub fn sign(&self, url: &Url) -> anyhow::Result<String> {
        self.compute_signature_bytes(url)
            .map(hex::encode)
            .ok_or_else(|| anyhow::anyhow!("Invalid HMAC key"))
    }

    /// 提取签名参数值（取首个出现）
    fn extract_signature(&self, url: &Url) -> Option<String> {
        url.query_pairs()
            .find(|(key, _)| key == self.signature_param.as_str())
            .map(|(_, value)| value.into_owned())
    }

    /// 规范化被签名的URL字节：移除签名参数，保留其余参数顺序
    ///
    /// 所有剩余参数都经过form_urlencoded重编码，签发与验证两侧一致
    fn canonical_url(&self, url: &Url) -> String {
        let mut canonical = url.clone();

        let remaining: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| key != self.signature_param.as_str())
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        if remaining.is_empty() {
            canonical.set_query(None);
        } else {
            let query = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(remaining)
                .finish();
            canonical.set_query(Some(&query));
        }

        canonical.to_string()
    }

    /// 计算规范URL的HMAC-SHA256
    fn compute_signature_bytes(&self, url: &Url) -> Option<Vec<u8>> {
        let mut mac = HmacSha256::new_from_slice(self.key.as_bytes()).ok()?;
        mac.update(self.canonical_url(url).as_bytes());
        Some(mac.finalize().into_bytes().to_vec())
    }
}

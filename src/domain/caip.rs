//! CAIP标识符解析模块
//!
//! 实现CAIP-2（链标识符）与CAIP-19（资产标识符）的严格语法解析
//! 格式: `namespace:reference` 与 `namespace:reference/assetNamespace:assetReference`

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DeepLinkError, Result};

/// EVM链的CAIP命名空间
pub const EVM_NAMESPACE: &str = "eip155";

/// 原生资产（native currency）的CAIP-19资产命名空间
pub const SLIP44_NAMESPACE: &str = "slip44";

/// CAIP-2链标识符
///
/// 例如 `eip155:1`（Ethereum主网）、`solana:5eykt4UsFv8P8NJdTREpY1vzqKqZKvdp`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaipChainId {
    /// 链命名空间（小写，3-8字符）
    pub namespace: String,
    /// 链引用（1-32字符）
    pub reference: String,
}

/// CAIP-19资产标识符
///
/// 例如 `eip155:1/slip44:60`（ETH原生资产）、
/// `eip155:1/erc20:0x6B175474E89094C44Da98b954EedeAC495271d0F`（DAI）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaipAssetId {
    /// 所属链
    pub chain: CaipChainId,
    /// 资产命名空间（如slip44、erc20、erc721）
    pub asset_namespace: String,
    /// 资产引用（合约地址或币种编号）
    pub asset_reference: String,
}

/// 校验链命名空间: [-a-z0-9]{3,8}
fn is_valid_namespace(s: &str) -> bool {
    (3..=8).contains(&s.len())
        && s.chars()
            .all(|c| c == '-' || c.is_ascii_lowercase() || c.is_ascii_digit())
}

/// 校验链引用: [-_a-zA-Z0-9]{1,32}
fn is_valid_reference(s: &str) -> bool {
    (1..=32).contains(&s.len())
        && s.chars()
            .all(|c| c == '-' || c == '_' || c.is_ascii_alphanumeric())
}

/// 校验资产引用: [-.%a-zA-Z0-9]{1,128}
fn is_valid_asset_reference(s: &str) -> bool {
    (1..=128).contains(&s.len())
        && s.chars()
            .all(|c| c == '-' || c == '.' || c == '%' || c.is_ascii_alphanumeric())
}

impl CaipChainId {
    /// 解析CAIP-2链标识符字符串
    ///
    /// 任何结构性违规均返回 `InvalidParameterFormat`，绝不产生部分填充的值
    pub fn parse(input: &str) -> Result<Self> {
        let (namespace, reference) = input.split_once(':').ok_or_else(|| {
            DeepLinkError::InvalidParameterFormat(format!("Invalid CAIP-2 chain id: {}", input))
        })?;

        if !is_valid_namespace(namespace) || !is_valid_reference(reference) {
            return Err(DeepLinkError::InvalidParameterFormat(format!(
                "Invalid CAIP-2 chain id: {}",
                input
            )));
        }

        Ok(Self {
            namespace: namespace.to_string(),
            reference: reference.to_string(),
        })
    }

    /// 是否为EVM链（eip155命名空间）
    pub fn is_evm(&self) -> bool {
        self.namespace == EVM_NAMESPACE
    }
}

impl fmt::Display for CaipChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.reference)
    }
}

impl CaipAssetId {
    /// 解析CAIP-19资产标识符字符串
    pub fn parse(input: &str) -> Result<Self> {
        let (chain_part, asset_part) = input.split_once('/').ok_or_else(|| {
            DeepLinkError::InvalidParameterFormat(format!("Invalid CAIP-19 asset id: {}", input))
        })?;

        let chain = CaipChainId::parse(chain_part)?;

        let (asset_namespace, asset_reference) = asset_part.split_once(':').ok_or_else(|| {
            DeepLinkError::InvalidParameterFormat(format!("Invalid CAIP-19 asset id: {}", input))
        })?;

        if !is_valid_namespace(asset_namespace) || !is_valid_asset_reference(asset_reference) {
            return Err(DeepLinkError::InvalidParameterFormat(format!(
                "Invalid CAIP-19 asset id: {}",
                input
            )));
        }

        Ok(Self {
            chain,
            asset_namespace: asset_namespace.to_string(),
            asset_reference: asset_reference.to_string(),
        })
    }

    /// 是否为EVM链上的资产
    pub fn is_evm(&self) -> bool {
        self.chain.is_evm()
    }

    /// 是否为链的原生资产（slip44命名空间）
    pub fn is_native_asset(&self) -> bool {
        self.asset_namespace == SLIP44_NAMESPACE
    }
}

impl fmt::Display for CaipAssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}:{}",
            self.chain, self.asset_namespace, self.asset_reference
        )
    }
}

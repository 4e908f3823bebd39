pub mod caip;
pub mod deep_link;

pub use caip::{CaipAssetId, CaipChainId};
pub use deep_link::{
    Destination, DeferredDeepLink, DeferredDeepLinkRoute, ParsedDeepLink, QueryParams,
    SignatureStatus,
};

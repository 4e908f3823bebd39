pub mod deep_link_parser;
pub mod deferred_deep_link;
pub mod routes;

pub use deep_link_parser::DeepLinkParser;
pub use deferred_deep_link::DeferredDeepLinkManager;

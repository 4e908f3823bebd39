pub mod url_utils;

pub use url_utils::{decimal_to_hex_chain_id, encode_path_segment, path_and_query};

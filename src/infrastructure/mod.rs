pub mod cookie_store;
pub mod logging;

pub use cookie_store::{CookieRecord, CookieStore, MemoryCookieStore, Navigator};

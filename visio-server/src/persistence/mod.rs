mod http_store;
mod message_store;

pub use http_store::*;
pub use message_store::*;

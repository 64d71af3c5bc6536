mod chat_relay;
mod persist_outcome;

pub use chat_relay::*;
pub use persist_outcome::*;

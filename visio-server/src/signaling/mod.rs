mod signaling_relay;
mod signaling_service;
mod ws_handler;

pub use signaling_relay::*;
pub use signaling_service::*;
pub use ws_handler::*;

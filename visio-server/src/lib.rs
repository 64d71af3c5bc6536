pub mod chat;
pub mod config;
pub mod error;
pub mod persistence;
pub mod registry;
pub mod room;
pub mod signaling;
pub mod transport;

pub use chat::*;
pub use config::ServerConfig;
pub use error::{Result, SignalingError};
pub use persistence::*;
pub use registry::*;
pub use room::*;
pub use signaling::*;
pub use transport::Outbound;

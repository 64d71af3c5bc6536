mod chat;
mod connection;
mod event;
mod room;
mod signaling;

pub use chat::{ChatMessage, StoredMessage};
pub use connection::ConnectionId;
pub use event::{ClientEvent, ServerEvent};
pub use room::RoomId;
pub use signaling::SignalKind;

use thiserror::Error;
use visio_core::{ConnectionId, RoomId};

/// Failure conditions of the signaling core. None of them is fatal to the
/// process; each one is scoped to a single connection or room.
#[derive(Debug, Error)]
pub enum SignalingError {
    #[error("connection {0} is not registered")]
    ConnectionNotFound(ConnectionId),

    #[error("room {0} does not exist")]
    RoomNotFound(RoomId),

    #[error("connection {0} is closed")]
    ConnectionClosed(ConnectionId),

    #[error("persistence service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("protocol violation: {0}")]
    ProtocolViolation(String),

    #[error("failed to encode event: {0}")]
    Encode(#[from] serde_json::Error),
}

impl From<reqwest::Error> for SignalingError {
    fn from(e: reqwest::Error) -> Self {
        SignalingError::ServiceUnavailable(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SignalingError>;

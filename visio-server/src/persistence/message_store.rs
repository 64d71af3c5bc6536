use crate::error::Result;
use async_trait::async_trait;
use visio_core::{RoomId, StoredMessage};

/// Client side of the service that keeps chat history.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Stores one chat message. Fails with `ServiceUnavailable` when the
    /// service cannot be reached or rejects the request.
    async fn save(&self, content: &str, sender: &str, room: &RoomId) -> Result<StoredMessage>;

    /// Stored messages of a room, oldest first. Never fails: an unreachable
    /// service or an unknown room yields an empty history.
    async fn history(&self, room: &RoomId) -> Vec<StoredMessage>;
}

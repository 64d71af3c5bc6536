use crate::chat::PersistOutcome;
use crate::error::Result;
use crate::persistence::MessageStore;
use crate::registry::ConnectionRegistry;
use crate::room::RoomCoordinator;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;
use visio_core::{ChatMessage, ConnectionId, RoomId, ServerEvent};

/// Room-scoped chat fan-out with detached persistence and join-time backlog.
pub struct ChatRelay {
    rooms: Arc<RoomCoordinator>,
    registry: Arc<ConnectionRegistry>,
    store: Arc<dyn MessageStore>,
    outcomes: mpsc::UnboundedSender<PersistOutcome>,
}

impl ChatRelay {
    pub fn new(
        rooms: Arc<RoomCoordinator>,
        registry: Arc<ConnectionRegistry>,
        store: Arc<dyn MessageStore>,
        outcomes: mpsc::UnboundedSender<PersistOutcome>,
    ) -> Self {
        Self {
            rooms,
            registry,
            store,
            outcomes,
        }
    }

    /// Delivers the message to everyone in the room but `origin`, then hands
    /// it to the store in the background. Returns the number of recipients.
    pub fn send(&self, message: ChatMessage, origin: ConnectionId) -> Result<usize> {
        let event = ServerEvent::ReceiveChatMessage {
            content: message.content.clone(),
            sender_id: message.sender_id.clone(),
            timestamp: message.created_at,
        };
        let delivered = self.rooms.broadcast(&message.room, event, Some(origin));

        self.persist(message);

        delivered
    }

    fn persist(&self, message: ChatMessage) {
        let store = self.store.clone();
        let outcomes = self.outcomes.clone();

        tokio::spawn(async move {
            let result = store
                .save(&message.content, &message.sender_id, &message.room)
                .await;
            let _ = outcomes.send(PersistOutcome { message, result });
        });
    }

    /// Fetches the room backlog and sends it to the connection that just
    /// joined. Skipped if the connection has moved on by the time it arrives.
    pub fn on_join(&self, id: ConnectionId, room_id: RoomId) -> JoinHandle<()> {
        let store = self.store.clone();
        let registry = self.registry.clone();

        tokio::spawn(async move {
            let messages = store.history(&room_id).await;

            let still_there = registry
                .lookup(id)
                .is_ok_and(|connection| connection.room() == Some(&room_id));
            if !still_there {
                debug!("{} left {} before its history arrived", id, room_id);
                return;
            }

            debug!("Sending {} stored messages of {} to {}", messages.len(), room_id, id);
            if let Err(e) = registry.deliver(id, ServerEvent::MessageHistory { messages }) {
                debug!("History for {} not delivered: {}", id, e);
            }
        })
    }
}

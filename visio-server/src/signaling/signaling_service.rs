use crate::chat::{ChatRelay, PersistOutcome, spawn_outcome_logger};
use crate::error::SignalingError;
use crate::persistence::MessageStore;
use crate::registry::ConnectionRegistry;
use crate::room::RoomCoordinator;
use crate::signaling::{SignalingRelay, ws_handler};
use crate::transport::Outbound;
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tower_http::cors::CorsLayer;
use tracing::{debug, info, warn};
use visio_core::{ChatMessage, ClientEvent, ConnectionId, RoomId, ServerEvent, SignalKind};

struct SignalingInner {
    registry: Arc<ConnectionRegistry>,
    rooms: Arc<RoomCoordinator>,
    relay: SignalingRelay,
    chat: ChatRelay,
}

/// Top-level server object. Owns one independent set of connections and
/// rooms; cloning shares it.
#[derive(Clone)]
pub struct SignalingService {
    inner: Arc<SignalingInner>,
}

impl SignalingService {
    /// Must be called inside a Tokio runtime: save outcomes are drained by a
    /// logging task spawned here.
    pub fn new(store: Arc<dyn MessageStore>) -> Self {
        let (outcomes_tx, outcomes_rx) = mpsc::unbounded_channel();
        spawn_outcome_logger(outcomes_rx);
        Self::with_outcomes(store, outcomes_tx)
    }

    /// Same as `new`, but save outcomes go to the given channel.
    pub fn with_outcomes(
        store: Arc<dyn MessageStore>,
        outcomes: mpsc::UnboundedSender<PersistOutcome>,
    ) -> Self {
        let registry = Arc::new(ConnectionRegistry::new());
        let rooms = Arc::new(RoomCoordinator::new(registry.clone()));

        Self {
            inner: Arc::new(SignalingInner {
                relay: SignalingRelay::new(registry.clone()),
                chat: ChatRelay::new(rooms.clone(), registry.clone(), store, outcomes),
                registry,
                rooms,
            }),
        }
    }

    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.inner.registry
    }

    pub fn rooms(&self) -> &Arc<RoomCoordinator> {
        &self.inner.rooms
    }

    /// Registers a new connection and tells it its id.
    pub fn connect(&self, outbound: Outbound) -> ConnectionId {
        let id = self.inner.registry.register(outbound);
        if let Err(e) = self
            .inner
            .registry
            .deliver(id, ServerEvent::Welcome { connection_id: id })
        {
            debug!("Welcome for {} not delivered: {}", id, e);
        }
        id
    }

    /// Handles one inbound event to completion. Storage I/O started here runs
    /// in the background and never delays the next event.
    pub fn dispatch(&self, id: ConnectionId, event: ClientEvent) {
        match event {
            ClientEvent::JoinRoom { room_id } => self.handle_join(id, room_id),
            ClientEvent::LeaveRoom => {
                if self.inner.rooms.leave(id).is_none() {
                    debug!("{} asked to leave but is in no room", id);
                }
            }
            ClientEvent::SendingOffer { payload, target } => {
                self.inner.relay.relay(SignalKind::Offer, payload, id, target);
            }
            ClientEvent::SendingAnswer { payload, target } => {
                self.inner.relay.relay(SignalKind::Answer, payload, id, target);
            }
            ClientEvent::SendingIceCandidate { payload, target } => {
                self.inner
                    .relay
                    .relay(SignalKind::IceCandidate, payload, id, target);
            }
            ClientEvent::SendChatMessage {
                content,
                room_id,
                sender_id,
            } => self.handle_chat(id, content, room_id, sender_id),
        }
    }

    fn handle_join(&self, id: ConnectionId, room_id: RoomId) {
        match self.inner.rooms.join(id, room_id.clone()) {
            Ok(joined) => {
                if let Err(e) = self.inner.registry.deliver(
                    id,
                    ServerEvent::GetExistingUsers {
                        users: joined.others,
                    },
                ) {
                    debug!("Presence list for {} not delivered: {}", id, e);
                }
                // History was already sent on the first join.
                if !joined.rejoined {
                    self.inner.chat.on_join(id, room_id);
                }
            }
            Err(e) => warn!("{} could not join room {}: {}", id, room_id, e),
        }
    }

    fn handle_chat(&self, id: ConnectionId, content: String, room_id: RoomId, sender_id: String) {
        let in_room = self
            .inner
            .registry
            .lookup(id)
            .is_ok_and(|connection| connection.room() == Some(&room_id));

        if !in_room {
            let violation = SignalingError::ProtocolViolation(format!(
                "chat for room {room_id} from a connection outside it"
            ));
            warn!("Discarding event from {}: {}", id, violation);
            return;
        }

        match self
            .inner
            .chat
            .send(ChatMessage::new(content, sender_id, room_id.clone()), id)
        {
            Ok(delivered) => debug!("Chat from {} in {} reached {} members", id, room_id, delivered),
            Err(e) => warn!("Chat from {} in {} not delivered: {}", id, room_id, e),
        }
    }

    /// Unregisters a connection and takes it out of its room. Safe to call
    /// more than once.
    pub fn disconnect(&self, id: ConnectionId) {
        self.inner.registry.unregister(id, &self.inner.rooms);
    }

    /// Disconnects every live connection, which also closes every room.
    pub fn shutdown(&self) {
        let ids = self.inner.registry.ids();
        info!("Shutting down, closing {} connections", ids.len());
        for id in ids {
            self.disconnect(id);
        }
    }

    pub fn router(self) -> Router {
        Router::new()
            .route("/ws", get(ws_handler))
            .route("/health", get(health_handler))
            .with_state(self)
            .layer(CorsLayer::permissive())
    }

    /// Serves on `listener` until `shutdown` resolves, then stops accepting
    /// and waits for in-flight HTTP requests. Upgraded sockets are not
    /// tracked; call [`SignalingService::shutdown`] afterwards to drop them.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        info!("Signaling server listening on {}", listener.local_addr()?);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Signaling server stopped accepting connections");
        Ok(())
    }
}

async fn health_handler(State(service): State<SignalingService>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "rooms": service.rooms().room_count(),
        "connections": service.registry().len(),
    }))
}

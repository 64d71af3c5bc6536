use crate::transport::Outbound;
use chrono::{DateTime, Utc};
use visio_core::{ConnectionId, RoomId, ServerEvent};

/// Lifecycle of a connection: `Unbound -> InRoom <-> InRoom'`, any state `-> Closed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    Unbound,
    InRoom(RoomId),
    Closed,
}

#[derive(Debug, Clone)]
pub struct Connection {
    id: ConnectionId,
    state: ConnectionState,
    created_at: DateTime<Utc>,
    outbound: Outbound,
}

impl Connection {
    pub(crate) fn new(id: ConnectionId, outbound: Outbound) -> Self {
        Self {
            id,
            state: ConnectionState::Unbound,
            created_at: Utc::now(),
            outbound,
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    pub fn room(&self) -> Option<&RoomId> {
        match &self.state {
            ConnectionState::InRoom(room_id) => Some(room_id),
            _ => None,
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn deliver(&self, event: ServerEvent) -> bool {
        self.outbound.deliver(event)
    }

    pub(crate) fn set_state(&mut self, state: ConnectionState) {
        self.state = state;
    }
}

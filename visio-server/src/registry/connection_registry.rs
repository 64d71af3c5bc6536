use crate::error::{Result, SignalingError};
use crate::registry::{Connection, ConnectionState};
use crate::room::RoomCoordinator;
use crate::transport::Outbound;
use dashmap::DashMap;
use tracing::{debug, info};
use visio_core::{ConnectionId, RoomId, ServerEvent};

/// Owns every live connection and its outbound channel.
#[derive(Default)]
pub struct ConnectionRegistry {
    connections: DashMap<ConnectionId, Connection>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, outbound: Outbound) -> ConnectionId {
        let id = ConnectionId::new();
        self.connections.insert(id, Connection::new(id, outbound));
        info!("Registered connection {}", id);
        id
    }

    /// Removes a connection, then takes it out of the room recorded on the
    /// removed entry so the remaining members are told. Unknown ids are
    /// ignored.
    ///
    /// Removal comes first: a concurrent `join` either sees the connection
    /// gone and backs out, or records its room before the removal, in which
    /// case the room is departed here.
    pub fn unregister(&self, id: ConnectionId, rooms: &RoomCoordinator) -> Option<Connection> {
        let (_, mut connection) = self.connections.remove(&id)?;

        if let Some(room_id) = connection.room() {
            rooms.depart(id, room_id);
        }

        connection.set_state(ConnectionState::Closed);
        info!("Unregistered connection {}", id);
        Some(connection)
    }

    pub fn lookup(&self, id: ConnectionId) -> Result<Connection> {
        self.connections
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or(SignalingError::ConnectionNotFound(id))
    }

    /// Pushes an event onto one connection's channel without cloning the
    /// connection record.
    pub fn deliver(&self, id: ConnectionId, event: ServerEvent) -> Result<()> {
        let entry = self
            .connections
            .get(&id)
            .ok_or(SignalingError::ConnectionNotFound(id))?;

        if entry.deliver(event) {
            Ok(())
        } else {
            debug!("Outbound channel of {} already closed", id);
            Err(SignalingError::ConnectionClosed(id))
        }
    }

    pub(crate) fn set_room(&self, id: ConnectionId, room: Option<RoomId>) -> Result<()> {
        let mut entry = self
            .connections
            .get_mut(&id)
            .ok_or(SignalingError::ConnectionNotFound(id))?;

        entry.set_state(match room {
            Some(room_id) => ConnectionState::InRoom(room_id),
            None => ConnectionState::Unbound,
        });
        Ok(())
    }

    pub fn ids(&self) -> Vec<ConnectionId> {
        self.connections.iter().map(|entry| *entry.key()).collect()
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}

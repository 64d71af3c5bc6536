use crate::error::{Result, SignalingError};
use crate::registry::ConnectionRegistry;
use crate::room::Room;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};
use visio_core::{ConnectionId, RoomId, ServerEvent};

/// Outcome of a join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Joined {
    /// Members that were already in the room, in join order.
    pub others: Vec<ConnectionId>,
    /// The connection was already in this room; nothing changed.
    pub rejoined: bool,
}

/// Owns the ephemeral rooms and their membership.
///
/// Membership changes happen under the map guard of the affected room and
/// never span an await. Events are pushed after the guard is released.
pub struct RoomCoordinator {
    rooms: DashMap<RoomId, Room>,
    registry: Arc<ConnectionRegistry>,
}

impl RoomCoordinator {
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self {
            rooms: DashMap::new(),
            registry,
        }
    }

    /// Moves a connection into `room_id` and reports the members that were
    /// already there. A connection sitting in another room is taken out of it
    /// first.
    pub fn join(&self, id: ConnectionId, room_id: RoomId) -> Result<Joined> {
        let connection = self.registry.lookup(id)?;

        match connection.room() {
            Some(current) if *current == room_id => {
                debug!("{} is already in room {}", id, room_id);
                return Ok(Joined {
                    others: self.members_except(&room_id, id),
                    rejoined: true,
                });
            }
            Some(_) => {
                self.leave(id);
            }
            None => {}
        }

        let others = {
            let mut room = self.rooms.entry(room_id.clone()).or_insert_with(|| {
                info!("Creating room {}", room_id);
                Room::new(room_id.clone())
            });
            let others = room.others(id);
            room.insert(id);
            others
        };

        if let Err(e) = self.registry.set_room(id, Some(room_id.clone())) {
            // Unregistered while joining.
            self.depart(id, &room_id);
            return Err(e);
        }

        info!("{} joined room {} ({} already present)", id, room_id, others.len());
        self.notify(&others, &ServerEvent::UserJoined { peer_id: id });

        Ok(Joined {
            others,
            rejoined: false,
        })
    }

    /// Takes a connection out of its current room and tells the remaining
    /// members. Returns the room that was left; a connection in no room is
    /// left untouched.
    pub fn leave(&self, id: ConnectionId) -> Option<RoomId> {
        let connection = self.registry.lookup(id).ok()?;
        let room_id = connection.room()?.clone();

        if let Err(e) = self.registry.set_room(id, None) {
            debug!("Leaving {} without registry update: {}", room_id, e);
        }
        self.depart(id, &room_id);

        Some(room_id)
    }

    /// Removes one member from one room, drops the room once it is empty and
    /// notifies whoever is left.
    pub(crate) fn depart(&self, id: ConnectionId, room_id: &RoomId) {
        let remaining = match self.rooms.get_mut(room_id) {
            Some(mut room) => {
                if !room.remove(id) {
                    return;
                }
                room.members().to_vec()
            }
            None => {
                warn!("{} left room {} which no longer exists", id, room_id);
                return;
            }
        };

        if self.rooms.remove_if(room_id, |_, room| room.is_empty()).is_some() {
            info!("Room {} is empty, closing it", room_id);
        }

        info!("{} left room {}", id, room_id);
        self.notify(&remaining, &ServerEvent::UserLeft { peer_id: id });
    }

    /// Delivers `event` to every member of `room_id` except `exclude`.
    /// Returns how many members it was handed to.
    pub fn broadcast(
        &self,
        room_id: &RoomId,
        event: ServerEvent,
        exclude: Option<ConnectionId>,
    ) -> Result<usize> {
        let recipients: Vec<ConnectionId> = {
            let room = self
                .rooms
                .get(room_id)
                .ok_or_else(|| SignalingError::RoomNotFound(room_id.clone()))?;
            room.members()
                .iter()
                .copied()
                .filter(|member| Some(*member) != exclude)
                .collect()
        };

        Ok(self.notify(&recipients, &event))
    }

    fn notify(&self, recipients: &[ConnectionId], event: &ServerEvent) -> usize {
        recipients
            .iter()
            .filter(|peer| match self.registry.deliver(**peer, event.clone()) {
                Ok(()) => true,
                Err(e) => {
                    debug!("Skipping {}: {}", peer, e);
                    false
                }
            })
            .count()
    }

    pub fn members(&self, room_id: &RoomId) -> Vec<ConnectionId> {
        self.rooms
            .get(room_id)
            .map(|room| room.members().to_vec())
            .unwrap_or_default()
    }

    fn members_except(&self, room_id: &RoomId, id: ConnectionId) -> Vec<ConnectionId> {
        self.rooms
            .get(room_id)
            .map(|room| room.others(id))
            .unwrap_or_default()
    }

    pub fn room_ids(&self) -> Vec<RoomId> {
        self.rooms.iter().map(|entry| entry.key().clone()).collect()
    }

    pub fn contains(&self, room_id: &RoomId) -> bool {
        self.rooms.contains_key(room_id)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}

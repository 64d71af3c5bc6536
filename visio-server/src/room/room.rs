use visio_core::{ConnectionId, RoomId};

/// Live membership of one room, kept in join order so presence lists come
/// out the same way every time.
#[derive(Debug, Clone)]
pub struct Room {
    id: RoomId,
    members: Vec<ConnectionId>,
}

impl Room {
    pub fn new(id: RoomId) -> Self {
        Self {
            id,
            members: Vec::new(),
        }
    }

    pub fn id(&self) -> &RoomId {
        &self.id
    }

    /// Returns `false` if the connection was already a member.
    pub fn insert(&mut self, id: ConnectionId) -> bool {
        if self.members.contains(&id) {
            return false;
        }
        self.members.push(id);
        true
    }

    pub fn remove(&mut self, id: ConnectionId) -> bool {
        let before = self.members.len();
        self.members.retain(|member| *member != id);
        self.members.len() != before
    }

    pub fn members(&self) -> &[ConnectionId] {
        &self.members
    }

    pub fn others(&self, except: ConnectionId) -> Vec<ConnectionId> {
        self.members
            .iter()
            .copied()
            .filter(|member| *member != except)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

use crate::model::room::RoomId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A chat message as it travels through the relay. Not stored here.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub content: String,
    pub sender_id: String,
    pub room: RoomId,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(content: String, sender_id: String, room: RoomId) -> Self {
        Self {
            content,
            sender_id,
            room,
            created_at: Utc::now(),
        }
    }
}

/// A message record as returned by the CRUD service.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoredMessage {
    #[serde(alias = "_id")]
    pub id: String,
    pub content: String,
    pub sender: String,
    pub room: RoomId,
    pub created_at: DateTime<Utc>,
}

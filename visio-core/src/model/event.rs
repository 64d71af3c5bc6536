use crate::model::chat::StoredMessage;
use crate::model::connection::ConnectionId;
use crate::model::room::RoomId;
use crate::model::signaling::SignalKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Events a client sends to the signaling server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "d", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ClientEvent {
    JoinRoom {
        room_id: RoomId,
    },
    LeaveRoom,
    SendingOffer {
        payload: Value,
        target: ConnectionId,
    },
    SendingAnswer {
        payload: Value,
        target: ConnectionId,
    },
    SendingIceCandidate {
        payload: Value,
        target: ConnectionId,
    },
    SendChatMessage {
        content: String,
        room_id: RoomId,
        sender_id: String,
    },
}

impl ClientEvent {
    /// Builds the inbound event for a negotiation message of the given kind.
    pub fn sending(kind: SignalKind, payload: Value, target: ConnectionId) -> Self {
        match kind {
            SignalKind::Offer => ClientEvent::SendingOffer { payload, target },
            SignalKind::Answer => ClientEvent::SendingAnswer { payload, target },
            SignalKind::IceCandidate => ClientEvent::SendingIceCandidate { payload, target },
        }
    }
}

/// Events the signaling server pushes to a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "d", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ServerEvent {
    Welcome {
        connection_id: ConnectionId,
    },
    GetExistingUsers {
        users: Vec<ConnectionId>,
    },
    UserJoined {
        peer_id: ConnectionId,
    },
    UserLeft {
        peer_id: ConnectionId,
    },
    ReceivingOffer {
        payload: Value,
        from: ConnectionId,
    },
    ReceivingAnswer {
        payload: Value,
        from: ConnectionId,
    },
    ReceivingIceCandidate {
        payload: Value,
        from: ConnectionId,
    },
    ReceiveChatMessage {
        content: String,
        sender_id: String,
        timestamp: DateTime<Utc>,
    },
    MessageHistory {
        messages: Vec<StoredMessage>,
    },
}

impl ServerEvent {
    /// Builds the outbound event delivering a negotiation message to its target.
    pub fn receiving(kind: SignalKind, payload: Value, from: ConnectionId) -> Self {
        match kind {
            SignalKind::Offer => ServerEvent::ReceivingOffer { payload, from },
            SignalKind::Answer => ServerEvent::ReceivingAnswer { payload, from },
            SignalKind::IceCandidate => ServerEvent::ReceivingIceCandidate { payload, from },
        }
    }
}

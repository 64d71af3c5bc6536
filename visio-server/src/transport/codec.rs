use crate::error::{Result, SignalingError};
use axum::extract::ws::Message;
use visio_core::{ClientEvent, ServerEvent};

/// Decodes one inbound text frame. Anything that is not a known event is a
/// protocol violation scoped to the frame.
pub fn decode(text: &str) -> Result<ClientEvent> {
    serde_json::from_str(text).map_err(|e| SignalingError::ProtocolViolation(e.to_string()))
}

pub fn encode(event: &ServerEvent) -> Result<Message> {
    let json = serde_json::to_string(event)?;
    Ok(Message::Text(json.into()))
}

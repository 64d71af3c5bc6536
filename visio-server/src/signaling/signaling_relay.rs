use crate::registry::ConnectionRegistry;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};
use visio_core::{ConnectionId, ServerEvent, SignalKind};

/// Point-to-point forwarding of offers, answers and ICE candidates.
///
/// Payloads are passed through untouched. Messages from one sender to one
/// target keep their order because both the sender's inbound loop and the
/// target's outbound channel are FIFO.
pub struct SignalingRelay {
    registry: Arc<ConnectionRegistry>,
}

impl SignalingRelay {
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// Returns whether the message reached the target's channel. A stale
    /// target is normal churn: the message is dropped and only logged.
    pub fn relay(&self, kind: SignalKind, payload: Value, from: ConnectionId, to: ConnectionId) -> bool {
        match self.registry.deliver(to, ServerEvent::receiving(kind, payload, from)) {
            Ok(()) => {
                debug!("Relayed {} from {} to {}", kind, from, to);
                true
            }
            Err(e) => {
                info!("Dropping {} from {} to {}: {}", kind, from, to, e);
                false
            }
        }
    }
}

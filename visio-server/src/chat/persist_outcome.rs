use crate::error::SignalingError;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use visio_core::{ChatMessage, StoredMessage};

/// Result of one detached save, reported after delivery already happened.
#[derive(Debug)]
pub struct PersistOutcome {
    pub message: ChatMessage,
    pub result: Result<StoredMessage, SignalingError>,
}

/// Drains save outcomes into the log until every sender is gone.
pub fn spawn_outcome_logger(mut outcomes: mpsc::UnboundedReceiver<PersistOutcome>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(outcome) = outcomes.recv().await {
            match outcome.result {
                Ok(stored) => debug!("Persisted chat message {} in room {}", stored.id, stored.room),
                Err(e) => warn!(
                    "Dropped chat message from {} in room {}: {}",
                    outcome.message.sender_id, outcome.message.room, e
                ),
            }
        }
        debug!("Persistence outcome channel closed");
    })
}

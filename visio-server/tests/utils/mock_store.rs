use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use visio_core::{RoomId, StoredMessage};
use visio_server::{MessageStore, SignalingError};

/// In-memory MessageStore with failure and latency injection.
#[derive(Clone, Default)]
pub struct MockMessageStore {
    /// Everything saved or seeded, in insertion order.
    messages: Arc<Mutex<Vec<StoredMessage>>>,
    fail_saves: Arc<AtomicBool>,
    fail_history: Arc<AtomicBool>,
    save_delay_ms: Arc<AtomicU64>,
    next_id: Arc<AtomicU64>,
}

impl MockMessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    pub fn fail_history(&self, fail: bool) {
        self.fail_history.store(fail, Ordering::SeqCst);
    }

    pub fn set_save_delay(&self, delay: Duration) {
        self.save_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    /// Pre-populate the store as if the messages had been saved earlier.
    pub async fn seed(&self, messages: Vec<StoredMessage>) {
        self.messages.lock().await.extend(messages);
    }

    pub async fn saved(&self) -> Vec<StoredMessage> {
        self.messages.lock().await.clone()
    }
}

#[async_trait]
impl MessageStore for MockMessageStore {
    async fn save(
        &self,
        content: &str,
        sender: &str,
        room: &RoomId,
    ) -> Result<StoredMessage, SignalingError> {
        let delay = self.save_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        if self.fail_saves.load(Ordering::SeqCst) {
            tracing::debug!("[MockStore] rejecting save for room {}", room);
            return Err(SignalingError::ServiceUnavailable(
                "mock store is down".to_string(),
            ));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let stored = StoredMessage {
            id: format!("msg-{id}"),
            content: content.to_string(),
            sender: sender.to_string(),
            room: room.clone(),
            created_at: Utc::now(),
        };

        self.messages.lock().await.push(stored.clone());
        Ok(stored)
    }

    async fn history(&self, room: &RoomId) -> Vec<StoredMessage> {
        if self.fail_history.load(Ordering::SeqCst) {
            return Vec::new();
        }

        let mut messages: Vec<StoredMessage> = self
            .messages
            .lock()
            .await
            .iter()
            .filter(|message| &message.room == room)
            .cloned()
            .collect();
        messages.sort_by_key(|message| message.created_at);
        messages
    }
}

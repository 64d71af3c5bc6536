use crate::error::{Result, SignalingError};
use crate::persistence::MessageStore;
use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};
use visio_core::{RoomId, StoredMessage};

#[derive(Debug, Serialize)]
struct CreateMessageRequest<'a> {
    content: &'a str,
    sender: &'a str,
    room: &'a str,
}

/// `MessageStore` backed by the CRUD service's REST API:
/// `POST /messages` and `GET /messages/room/{roomId}`.
pub struct HttpMessageStore {
    base_url: Url,
    client: reqwest::Client,
}

impl HttpMessageStore {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| {
            SignalingError::ServiceUnavailable(format!("invalid API url {base_url}: {e}"))
        })?;

        if base_url.cannot_be_a_base() {
            return Err(SignalingError::ServiceUnavailable(format!(
                "API url {base_url} cannot be used as a base"
            )));
        }

        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends path segments, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn fetch_history(&self, room: &RoomId) -> Result<Vec<StoredMessage>> {
        let url = self.endpoint(&["messages", "room", room.as_str()]);
        let response = self.client.get(url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!("No history for room {}", room);
            return Ok(Vec::new());
        }

        let mut messages: Vec<StoredMessage> = response.error_for_status()?.json().await?;
        messages.sort_by_key(|message| message.created_at);
        Ok(messages)
    }
}

#[async_trait]
impl MessageStore for HttpMessageStore {
    async fn save(&self, content: &str, sender: &str, room: &RoomId) -> Result<StoredMessage> {
        let body = CreateMessageRequest {
            content,
            sender,
            room: room.as_str(),
        };

        let stored = self
            .client
            .post(self.endpoint(&["messages"]))
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json::<StoredMessage>()
            .await?;

        debug!("Stored message {} in room {}", stored.id, room);
        Ok(stored)
    }

    async fn history(&self, room: &RoomId) -> Vec<StoredMessage> {
        match self.fetch_history(room).await {
            Ok(messages) => messages,
            Err(e) => {
                warn!("History for room {} unavailable: {}", room, e);
                Vec::new()
            }
        }
    }
}

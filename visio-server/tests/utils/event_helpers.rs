use anyhow::{Context, Result, bail};
use std::time::Duration;
use tokio::sync::mpsc;
use visio_core::{ConnectionId, ServerEvent};
use visio_server::{Outbound, PersistOutcome, SignalingService};

/// Timeout for an expected event (ms).
pub const EVENT_TIMEOUT_MS: u64 = 2000;

/// How long to listen before concluding nothing was delivered (ms).
pub const SILENCE_MS: u64 = 150;

/// A connection registered directly on the service, bypassing the socket.
pub struct TestPeer {
    pub id: ConnectionId,
    rx: mpsc::UnboundedReceiver<ServerEvent>,
}

impl TestPeer {
    /// Connects and consumes the welcome event.
    pub fn connect(service: &SignalingService) -> Self {
        let (outbound, mut rx) = Outbound::channel();
        let id = service.connect(outbound);

        match rx.try_recv() {
            Ok(ServerEvent::Welcome { connection_id }) => assert_eq!(connection_id, id),
            other => panic!("expected welcome, got {other:?}"),
        }

        Self { id, rx }
    }

    pub async fn next_event(&mut self) -> Result<ServerEvent> {
        tokio::time::timeout(Duration::from_millis(EVENT_TIMEOUT_MS), self.rx.recv())
            .await
            .context("Timeout waiting for event")?
            .context("Outbound channel closed")
    }

    /// Skips events until one matches.
    pub async fn wait_for<F>(&mut self, mut matches: F) -> Result<ServerEvent>
    where
        F: FnMut(&ServerEvent) -> bool,
    {
        loop {
            let event = self.next_event().await?;
            if matches(&event) {
                return Ok(event);
            }
            tracing::debug!("[TestPeer] skipping {:?}", event);
        }
    }

    /// Waits for the presence list that answers a join.
    pub async fn existing_users(&mut self) -> Result<Vec<ConnectionId>> {
        match self
            .wait_for(|e| matches!(e, ServerEvent::GetExistingUsers { .. }))
            .await?
        {
            ServerEvent::GetExistingUsers { users } => Ok(users),
            _ => unreachable!(),
        }
    }

    /// Collects whatever arrives until the channel goes quiet.
    pub async fn drain(&mut self) -> Vec<ServerEvent> {
        let mut events = Vec::new();
        while let Ok(Some(event)) =
            tokio::time::timeout(Duration::from_millis(SILENCE_MS), self.rx.recv()).await
        {
            events.push(event);
        }
        events
    }

    pub async fn expect_silence(&mut self) -> Result<()> {
        match tokio::time::timeout(Duration::from_millis(SILENCE_MS), self.rx.recv()).await {
            Err(_) | Ok(None) => Ok(()),
            Ok(Some(event)) => bail!("Unexpected event {:?}", event),
        }
    }
}

pub async fn next_outcome(
    outcomes: &mut mpsc::UnboundedReceiver<PersistOutcome>,
) -> Result<PersistOutcome> {
    tokio::time::timeout(Duration::from_millis(EVENT_TIMEOUT_MS), outcomes.recv())
        .await
        .context("Timeout waiting for persistence outcome")?
        .context("Outcome channel closed")
}

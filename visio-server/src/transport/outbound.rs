use tokio::sync::mpsc;
use visio_core::ServerEvent;

/// Sending half of one connection's duplex channel.
///
/// Events handed to `deliver` reach the socket writer in the order they were
/// delivered. Sending never waits, so one slow socket cannot hold up a fan-out
/// to the rest of a room; flow control is left to the socket itself.
#[derive(Debug, Clone)]
pub struct Outbound {
    tx: mpsc::UnboundedSender<ServerEvent>,
}

impl Outbound {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ServerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Returns `false` when the writer side has already gone away.
    pub fn deliver(&self, event: ServerEvent) -> bool {
        self.tx.send(event).is_ok()
    }
}

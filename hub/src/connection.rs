use log::*;
use tokio::sync::mpsc;
use wire::{Event, EventType};

use crate::UserId;

/// Unique identifier for a connection (server-generated)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionId(String);

impl ConnectionId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Receiving end of a connection's outbound queue, drained by the write pump.
pub type OutboundReceiver = mpsc::Receiver<String>;

/// Sending end of a connection's outbound queue.
///
/// Enqueueing never blocks. A full queue drops the frame, a closed queue
/// (connection mid-teardown) swallows it.
#[derive(Debug, Clone)]
pub struct OutboundSender {
    sender: mpsc::Sender<String>,
}

impl OutboundSender {
    pub(crate) fn new(sender: mpsc::Sender<String>) -> Self {
        Self { sender }
    }

    /// Serialize and enqueue one event for this connection alone.
    pub fn enqueue(&self, event: &Event) {
        match serde_json::to_string(event) {
            Ok(frame) => self.enqueue_frame(event.event_type(), frame),
            Err(e) => {
                error!("Failed to serialize {} event: {}", event.event_type(), e);
            }
        }
    }

    /// Enqueue an already-serialized frame - O(1), never blocks
    pub(crate) fn enqueue_frame(&self, kind: &'static str, frame: String) {
        match self.sender.try_send(frame) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                debug!("Dropping {} frame for slow connection", kind);
            }
            // Receiver gone; the connection is being torn down
            Err(mpsc::error::TrySendError::Closed(_)) => {}
        }
    }
}

/// Everything a session needs to run one registered connection.
pub struct ConnectionHandle {
    pub id: ConnectionId,
    pub user_id: UserId,
    /// Clone of the registered sender, for frames addressed to this
    /// connection alone (protocol error replies).
    pub sender: OutboundSender,
    /// Consumed by the write pump.
    pub receiver: OutboundReceiver,
}

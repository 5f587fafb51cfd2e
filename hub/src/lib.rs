//! WebSocket connection registry, fan-out, and presence for the chat hub.
//!
//! This crate owns the in-memory side of the chat service: who is connected
//! right now, on how many devices, and how a serialized frame reaches them.
//!
//! # Architecture
//!
//! - **Multiple connections per user**: Each device or tab opens its own
//!   socket; all of them are registered under the same user id.
//! - **Single registry slot per user**: Connections and presence share one
//!   map entry, so every transition for a user happens under one guard and
//!   a presence read can never observe a half-applied transition.
//! - **Bounded outbound queues**: Every connection owns a bounded queue of
//!   serialized frames. Enqueueing never blocks; frames for a full queue are
//!   dropped so one slow reader cannot stall delivery to anyone else.
//! - **Ephemeral delivery**: Frames are not stored. A user with no live
//!   connection misses the event and catches up from the REST history.
//!
//! # Lifecycle
//!
//! 1. The session authenticates, then calls [`Hub::connect`] and receives a
//!    [`ConnectionHandle`] carrying the queue ends.
//! 2. The write pump drains [`ConnectionHandle::receiver`] onto the socket.
//! 3. Senders route frames with [`Hub::send_to`]; per-connection replies go
//!    through [`ConnectionHandle::sender`].
//! 4. On teardown the session calls [`Hub::disconnect`] first, then drops its
//!    sender so the queue closes and the write pump drains out.
//!
//! # Modules
//!
//! - `connection`: connection ids, handles, and the non-blocking queue sender
//! - `presence`: presence snapshots and the presence event audience
//! - `registry`: the [`Hub`] itself

pub mod connection;
pub mod presence;
pub mod registry;

pub use connection::{ConnectionHandle, ConnectionId, OutboundReceiver, OutboundSender};
pub use presence::{Presence, PresenceAudience};
pub use registry::{Hub, HubConfig};

/// Type alias for user IDs (opaque strings issued by the identity service)
pub type UserId = String;

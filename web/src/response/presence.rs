//! Presence read response DTO
//!
//! Mirrors the shape of the presence events pushed over the WebSocket, so
//! clients parse both with the same code.

use hub::{Presence, UserId};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub(crate) struct PresenceResponse {
    pub(crate) user_id: UserId,
    pub(crate) online: bool,
    /// Unix seconds of the user's last transition to offline; 0 when this
    /// process has never seen them.
    pub(crate) last_seen: i64,
}

impl PresenceResponse {
    pub(crate) fn new(user_id: UserId, presence: Presence) -> Self {
        Self {
            user_id,
            online: presence.online,
            last_seen: presence.last_seen_unix(),
        }
    }
}

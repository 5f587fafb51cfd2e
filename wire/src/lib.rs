//! Wire format of the chat WebSocket protocol.
//!
//! Every frame, in both directions, is a JSON envelope of the form
//! `{"type": "<kind>", "data": {...}}`. Inbound frames decode in two stages
//! so that an unreadable envelope, an unknown kind, and a known kind with an
//! unreadable payload each get their own, different treatment. Outbound
//! frames serialize from [`Event`].

mod inbound;
mod outbound;

pub use inbound::{Inbound, MessagePayload, ReadPayload, TypingPayload};
pub use outbound::{ErrorCode, Event, EventType};

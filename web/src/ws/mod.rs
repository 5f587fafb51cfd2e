//! The WebSocket endpoint: upgrade authentication, the per-connection read
//! and write pumps, and inbound frame dispatch.

pub(crate) mod dispatch;
pub(crate) mod handler;
pub(crate) mod session;

//! Inbound frame dispatch.
//!
//! One decoded frame maps to at most one storage call and one fan-out.
//! Failure replies follow the wire contract: an unreadable envelope or a
//! failed save earns the offending connection an error frame, everything
//! else fails quietly so a misbehaving client cannot probe the hub for
//! reactions.

use chrono::Utc;
use wire::{ErrorCode, Event, Inbound, MessagePayload, ReadPayload, TypingPayload};

use crate::ws::session::Session;

use log::*;

/// Decodes and applies one text frame from a client.
pub(crate) async fn handle_frame(session: &Session, raw: &str) {
    match Inbound::decode(raw) {
        Inbound::Typing(payload) => handle_typing(session, payload).await,
        Inbound::Message(payload) => handle_message(session, payload).await,
        Inbound::Read(payload) => handle_read(session, payload).await,
        Inbound::Unknown(kind) => {
            debug!("Unknown event type {kind:?} from user {}", session.user_id);
            session.reply.enqueue(&Event::Error {
                error: ErrorCode::UnknownType,
            });
        }
        Inbound::Malformed => {
            debug!("Malformed frame from user {}", session.user_id);
            session.reply.enqueue(&Event::Error {
                error: ErrorCode::BadEvent,
            });
        }
        // Known kind with an undecodable payload; dropped without a reply
        Inbound::Skip => {}
    }
}

/// Typing indicators go to everyone else in the conversation. The sender's
/// own devices are excluded; a second tab gains nothing from knowing its
/// twin is typing.
async fn handle_typing(session: &Session, payload: TypingPayload) {
    let peers = match session.store.resolve_peers(&payload.conversation_id).await {
        Ok(peers) => peers,
        Err(e) => {
            debug!(
                "Dropping typing event for conversation {}: {e}",
                payload.conversation_id
            );
            return;
        }
    };

    let recipients: Vec<_> = peers
        .into_iter()
        .filter(|peer| peer != &session.user_id)
        .collect();

    let event = Event::Typing {
        conversation_id: payload.conversation_id,
        user_id: session.user_id.clone(),
        is_typing: payload.is_typing,
    };
    session.hub.send_to(&recipients, &event);
}

/// Messages persist before anyone hears about them. A message that peers
/// saw but the history lost would be worse than a rejected send, so a
/// failed save turns into an error reply and no fan-out.
async fn handle_message(session: &Session, payload: MessagePayload) {
    if payload.body.is_empty() {
        debug!("Dropping empty message from user {}", session.user_id);
        return;
    }

    let message = match session
        .store
        .create_message(&payload.conversation_id, &session.user_id, &payload.body)
        .await
    {
        Ok(message) => message,
        Err(e) => {
            warn!(
                "Failed to save message for conversation {}: {e}",
                payload.conversation_id
            );
            session.reply.enqueue(&Event::Error {
                error: ErrorCode::SaveFailed,
            });
            return;
        }
    };

    let peers = match session.store.resolve_peers(&message.conversation_id).await {
        Ok(peers) => peers,
        Err(e) => {
            warn!(
                "Saved message but could not resolve conversation {}: {e}",
                message.conversation_id
            );
            return;
        }
    };

    // Full participant set, sender included: their other devices stay in
    // sync through the echo
    let event = Event::Message {
        conversation_id: message.conversation_id.clone(),
        sender_id: message.sender_id.clone(),
        body: message.body.clone(),
        created_at: message.created_at.timestamp(),
    };
    session.hub.send_to(&peers, &event);
}

/// Read receipts are best effort. Nobody is notified, and a failed write
/// costs at most a stale unread badge until the next one.
async fn handle_read(session: &Session, payload: ReadPayload) {
    if let Err(e) = session
        .store
        .update_last_read(&payload.conversation_id, &session.user_id, Utc::now())
        .await
    {
        debug!(
            "Failed to move read marker for conversation {}: {e}",
            payload.conversation_id
        );
    }
}

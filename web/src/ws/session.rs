//! Per-connection read and write pumps.
//!
//! Each upgraded socket registers with the hub and splits in two: a spawned
//! write pump that drains the connection's outbound queue onto the socket,
//! and the read loop on the upgrade task that decodes and dispatches
//! inbound frames. The read loop owns teardown. It deregisters from the hub
//! first, then drops its queue sender; the write pump sees the closed
//! queue, drains what is left, and exits on its own.

use axum::extract::ws::{Message, WebSocket};
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use crate::ws::dispatch;
use hub::{ConnectionHandle, Hub, OutboundReceiver, OutboundSender, UserId};
use service::AppState;
use store::ConversationStore;

use log::*;

/// Everything frame dispatch needs from one live connection.
pub(crate) struct Session {
    pub(crate) user_id: UserId,
    pub(crate) hub: Arc<Hub>,
    pub(crate) store: Arc<dyn ConversationStore>,
    /// Replies addressed to this connection alone (protocol error frames).
    pub(crate) reply: OutboundSender,
}

/// Runs one upgraded socket to completion.
pub(crate) async fn run(socket: WebSocket, app_state: AppState, user_id: UserId) {
    let read_timeout = app_state.config.ws_read_timeout();
    let write_timeout = app_state.config.ws_write_timeout();

    let ConnectionHandle {
        id: connection_id,
        user_id,
        sender: reply,
        receiver,
    } = app_state.hub.connect(user_id);

    let (sink, stream) = socket.split();
    // Pinging at half the read timeout keeps an idle but healthy peer
    // alive: its protocol-level pong refreshes our read deadline
    tokio::spawn(write_pump(sink, receiver, write_timeout, read_timeout / 2));

    let session = Session {
        user_id: user_id.clone(),
        hub: app_state.hub.clone(),
        store: app_state.conversation_store.clone(),
        reply,
    };
    read_pump(stream, &session, read_timeout).await;

    // Deregister before closing the queue so no frame is routed to a
    // connection that is past its final drain
    app_state.hub.disconnect(&user_id, &connection_id);
    drop(session);
    info!("Chat session ended for user {user_id} ({connection_id})");
}

/// Reads frames until the peer goes away or falls silent for too long. Any
/// inbound traffic counts as liveness, pings and pongs included.
async fn read_pump(mut stream: SplitStream<WebSocket>, session: &Session, read_timeout: Duration) {
    loop {
        let incoming = match timeout(read_timeout, stream.next()).await {
            Err(_) => {
                info!("Closing silent connection of user {}", session.user_id);
                break;
            }
            Ok(None) => break,
            Ok(Some(Err(e))) => {
                debug!("WebSocket read error for user {}: {e}", session.user_id);
                break;
            }
            Ok(Some(Ok(incoming))) => incoming,
        };

        match incoming {
            Message::Text(raw) => dispatch::handle_frame(session, &raw).await,
            Message::Close(_) => break,
            // Pings are answered by the protocol layer; pongs and binary
            // frames only refresh the read deadline
            _ => {}
        }
    }
}

/// Drains the outbound queue onto the socket and keeps the connection alive
/// with periodic pings. Exits when the queue closes after teardown, or when
/// a write fails or overruns its deadline.
async fn write_pump(
    mut sink: SplitSink<WebSocket, Message>,
    mut receiver: OutboundReceiver,
    write_timeout: Duration,
    ping_interval: Duration,
) {
    let mut ping = tokio::time::interval(ping_interval);
    ping.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ping.tick() => {
                match timeout(write_timeout, sink.send(Message::Ping(Vec::new()))).await {
                    Ok(Ok(())) => {}
                    Ok(Err(_)) | Err(_) => break,
                }
            }
            maybe_frame = receiver.recv() => {
                let frame = match maybe_frame {
                    Some(frame) => frame,
                    // Queue closed and fully drained; clean exit
                    None => break,
                };
                match timeout(write_timeout, sink.send(Message::Text(frame))).await {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => {
                        debug!("WebSocket write failed: {e}");
                        break;
                    }
                    Err(_) => {
                        debug!("WebSocket write timed out");
                        break;
                    }
                }
            }
        }
    }

    let _ = sink.close().await;
}

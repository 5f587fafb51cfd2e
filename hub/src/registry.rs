use chrono::Utc;
use dashmap::DashMap;
use log::*;
use std::collections::HashMap;
use tokio::sync::mpsc;
use wire::{Event, EventType};

use crate::connection::{ConnectionHandle, ConnectionId, OutboundSender};
use crate::presence::{Presence, PresenceAudience};
use crate::UserId;

/// Tuning knobs for the hub.
#[derive(Debug, Clone)]
pub struct HubConfig {
    /// Capacity of each connection's outbound queue. Frames beyond this are
    /// dropped rather than queued.
    pub send_queue_capacity: usize,
    /// Who is told when a user's device connects or disconnects.
    pub presence_audience: PresenceAudience,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            send_queue_capacity: 256,
            presence_audience: PresenceAudience::ConnectedUser,
        }
    }
}

/// Registry slot for one user. Connections and presence share the slot so a
/// single guard covers every transition for that user.
#[derive(Debug, Default)]
struct UserEntry {
    connections: HashMap<ConnectionId, OutboundSender>,
    presence: Presence,
}

/// Connection registry and presence tracker shared by every session.
///
/// Slots survive the last disconnect: an empty slot keeps the user's
/// last-seen timestamp readable until the process restarts.
pub struct Hub {
    users: DashMap<UserId, UserEntry>,
    config: HubConfig,
}

impl Hub {
    pub fn new(config: HubConfig) -> Self {
        Self {
            users: DashMap::new(),
            config,
        }
    }

    /// Register a new connection for `user_id` - O(1)
    ///
    /// The user reads as online from the moment this returns. A presence
    /// event goes to the configured audience afterwards, so the first frame
    /// a new connection usually sees is its own presence echo.
    pub fn connect(&self, user_id: impl Into<UserId>) -> ConnectionHandle {
        let user_id = user_id.into();
        let connection_id = ConnectionId::new();
        let (tx, rx) = mpsc::channel(self.config.send_queue_capacity);
        let sender = OutboundSender::new(tx);

        let snapshot;
        {
            let mut entry = self.users.entry(user_id.clone()).or_default();
            entry
                .connections
                .insert(connection_id.clone(), sender.clone());
            entry.presence.online = true;
            snapshot = entry.presence;
            debug!(
                "User {} now has {} connections",
                user_id,
                entry.connections.len()
            );
        } // Release the slot guard before any fan-out

        info!("Registered chat connection {}", connection_id);
        self.publish_presence(&user_id, snapshot);

        ConnectionHandle {
            id: connection_id,
            user_id,
            sender,
            receiver: rx,
        }
    }

    /// Unregister one connection - O(1), safe to call twice
    ///
    /// When the last connection of a user goes away the user flips offline
    /// and `last_seen` is stamped. The registered queue sender drops here;
    /// once the session drops its own clone the write pump drains and exits.
    pub fn disconnect(&self, user_id: &str, connection_id: &ConnectionId) {
        let mut snapshot = None;
        if let Some(mut entry) = self.users.get_mut(user_id) {
            if entry.connections.remove(connection_id).is_some() {
                if entry.connections.is_empty() {
                    entry.presence.online = false;
                    entry.presence.last_seen = Some(Utc::now());
                }
                snapshot = Some(entry.presence);
            }
        } // Release the slot guard before any fan-out

        if let Some(snapshot) = snapshot {
            info!("Deregistered chat connection {}", connection_id);
            self.publish_presence(user_id, snapshot);
        }
    }

    /// Send one event to every connection of every listed user.
    ///
    /// The frame is serialized once and enqueued per connection without
    /// blocking; full queues drop it.
    pub fn send_to(&self, user_ids: &[UserId], event: &Event) {
        let frame = match serde_json::to_string(event) {
            Ok(frame) => frame,
            Err(e) => {
                error!("Failed to serialize {} event: {}", event.event_type(), e);
                return;
            }
        };

        for user_id in user_ids {
            if let Some(entry) = self.users.get(user_id) {
                for sender in entry.connections.values() {
                    sender.enqueue_frame(event.event_type(), frame.clone());
                }
            }
        }
    }

    /// Point-in-time presence for one user - O(1)
    ///
    /// Users this process has never seen read as offline with no last-seen
    /// timestamp.
    pub fn presence(&self, user_id: &str) -> Presence {
        self.users
            .get(user_id)
            .map(|entry| entry.presence)
            .unwrap_or_default()
    }

    /// Number of live connections for one user - O(1)
    pub fn connection_count(&self, user_id: &str) -> usize {
        self.users
            .get(user_id)
            .map_or(0, |entry| entry.connections.len())
    }

    /// Publish the post-transition presence snapshot to the configured
    /// audience. The event always carries what a concurrent [`Hub::presence`]
    /// read would return.
    fn publish_presence(&self, user_id: &str, snapshot: Presence) {
        let event = Event::Presence {
            user_id: user_id.to_string(),
            online: snapshot.online,
            last_seen: snapshot.last_seen_unix(),
        };
        match self.config.presence_audience {
            PresenceAudience::ConnectedUser => self.send_to(&[user_id.to_string()], &event),
            PresenceAudience::None => {}
        }
    }
}

impl Default for Hub {
    fn default() -> Self {
        Self::new(HubConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use tokio::sync::mpsc::error::TryRecvError;

    fn hub(capacity: usize) -> Hub {
        Hub::new(HubConfig {
            send_queue_capacity: capacity,
            presence_audience: PresenceAudience::ConnectedUser,
        })
    }

    /// Hub that publishes no presence events, so queues only hold what the
    /// test itself sends.
    fn quiet_hub(capacity: usize) -> Hub {
        Hub::new(HubConfig {
            send_queue_capacity: capacity,
            presence_audience: PresenceAudience::None,
        })
    }

    fn typing_event() -> Event {
        Event::Typing {
            conversation_id: "c1".to_string(),
            user_id: "someone".to_string(),
            is_typing: true,
        }
    }

    fn next_frame(handle: &mut ConnectionHandle) -> Option<Value> {
        handle
            .receiver
            .try_recv()
            .ok()
            .map(|frame| serde_json::from_str(&frame).unwrap())
    }

    #[test]
    fn user_is_online_while_any_connection_remains() {
        let hub = quiet_hub(8);

        let first = hub.connect("alice");
        let second = hub.connect("alice");
        assert!(hub.presence("alice").online);
        assert_eq!(hub.connection_count("alice"), 2);

        hub.disconnect("alice", &first.id);
        let presence = hub.presence("alice");
        assert!(presence.online);
        // No offline transition yet, so nothing is stamped
        assert_eq!(presence.last_seen, None);

        hub.disconnect("alice", &second.id);
        let presence = hub.presence("alice");
        assert!(!presence.online);
        assert!(presence.last_seen.is_some());
        assert_eq!(hub.connection_count("alice"), 0);
    }

    #[test]
    fn last_seen_is_monotonic_across_reconnects() {
        let hub = quiet_hub(8);

        let first = hub.connect("alice");
        hub.disconnect("alice", &first.id);
        let stamped_first = hub.presence("alice").last_seen.unwrap();

        std::thread::sleep(std::time::Duration::from_millis(5));

        let second = hub.connect("alice");
        // Reconnecting does not clear the old stamp
        assert_eq!(hub.presence("alice").last_seen, Some(stamped_first));

        hub.disconnect("alice", &second.id);
        let stamped_second = hub.presence("alice").last_seen.unwrap();
        assert!(stamped_second > stamped_first);
    }

    #[test]
    fn frames_reach_only_the_addressed_users() {
        let hub = quiet_hub(8);
        let mut alice = hub.connect("alice");
        let mut bob = hub.connect("bob");
        let mut carol = hub.connect("carol");

        hub.send_to(&["alice".to_string(), "bob".to_string()], &typing_event());

        assert_eq!(next_frame(&mut alice).unwrap()["type"], "typing");
        assert_eq!(next_frame(&mut bob).unwrap()["type"], "typing");
        assert!(matches!(carol.receiver.try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn every_device_of_a_user_gets_the_frame() {
        let hub = quiet_hub(8);
        let mut phone = hub.connect("alice");
        let mut laptop = hub.connect("alice");

        hub.send_to(&["alice".to_string()], &typing_event());

        assert!(next_frame(&mut phone).is_some());
        assert!(next_frame(&mut laptop).is_some());
    }

    #[test]
    fn full_queue_drops_instead_of_blocking() {
        let hub = quiet_hub(2);
        let mut alice = hub.connect("alice");

        for _ in 0..5 {
            hub.send_to(&["alice".to_string()], &typing_event());
        }

        // Exactly the queue capacity arrives; the rest were dropped
        assert!(next_frame(&mut alice).is_some());
        assert!(next_frame(&mut alice).is_some());
        assert!(matches!(alice.receiver.try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn one_slow_device_does_not_starve_the_rest() {
        let hub = quiet_hub(1);
        let mut slow = hub.connect("alice");
        let mut bob = hub.connect("bob");

        // Fill the slow device's queue, then fan out to both users
        hub.send_to(&["alice".to_string()], &typing_event());
        hub.send_to(&["alice".to_string(), "bob".to_string()], &typing_event());

        assert!(next_frame(&mut bob).is_some());
        assert!(next_frame(&mut slow).is_some());
        assert!(matches!(slow.receiver.try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn disconnect_is_idempotent() {
        let hub = quiet_hub(8);
        let alice = hub.connect("alice");

        hub.disconnect("alice", &alice.id);
        let stamped = hub.presence("alice").last_seen;

        hub.disconnect("alice", &alice.id);
        hub.disconnect("nobody", &ConnectionId::new());

        assert!(!hub.presence("alice").online);
        assert_eq!(hub.presence("alice").last_seen, stamped);
    }

    #[test]
    fn queue_closes_once_deregistered_and_session_sender_drops() {
        let hub = quiet_hub(8);
        let ConnectionHandle {
            id,
            user_id,
            sender,
            mut receiver,
        } = hub.connect("alice");

        hub.disconnect(&user_id, &id);
        drop(sender);

        assert!(matches!(
            receiver.try_recv(),
            Err(TryRecvError::Disconnected)
        ));
    }

    #[test]
    fn presence_events_mirror_registry_state() {
        let hub = hub(8);
        let mut phone = hub.connect("alice");

        let echo = next_frame(&mut phone).unwrap();
        assert_eq!(echo["type"], "presence");
        assert_eq!(echo["data"]["user_id"], "alice");
        assert_eq!(echo["data"]["online"], true);
        assert_eq!(echo["data"]["last_seen"], 0);

        let laptop = hub.connect("alice");
        let echo = next_frame(&mut phone).unwrap();
        assert_eq!(echo["data"]["online"], true);

        // Losing one of two devices leaves the user online, and the event
        // says so
        hub.disconnect("alice", &laptop.id);
        let echo = next_frame(&mut phone).unwrap();
        assert_eq!(echo["data"]["online"], true);
        assert_eq!(echo["data"]["last_seen"], 0);
    }

    #[test]
    fn offline_presence_reaches_no_one_after_the_last_disconnect() {
        let hub = hub(8);
        let mut alice = hub.connect("alice");
        let mut bob = hub.connect("bob");

        // Drain the connect echoes
        assert_eq!(next_frame(&mut alice).unwrap()["type"], "presence");
        assert_eq!(next_frame(&mut bob).unwrap()["type"], "presence");

        hub.disconnect("alice", &alice.id);

        // Deregistration happens before the offline event is published, so
        // the closing connection never sees it, and bob is not in the
        // audience
        assert!(next_frame(&mut alice).is_none());
        assert!(next_frame(&mut bob).is_none());
    }

    #[test]
    fn audience_none_suppresses_presence_events() {
        let hub = quiet_hub(8);
        let mut alice = hub.connect("alice");

        assert!(matches!(alice.receiver.try_recv(), Err(TryRecvError::Empty)));
        assert!(hub.presence("alice").online);
    }

    #[test]
    fn direct_enqueue_reaches_only_that_connection() {
        let hub = quiet_hub(8);
        let mut phone = hub.connect("alice");
        let mut laptop = hub.connect("alice");

        phone.sender.enqueue(&Event::Error {
            error: wire::ErrorCode::BadEvent,
        });

        let frame = next_frame(&mut phone).unwrap();
        assert_eq!(frame["type"], "error");
        assert_eq!(frame["data"]["error"], "bad_event");
        assert!(matches!(
            laptop.receiver.try_recv(),
            Err(TryRecvError::Empty)
        ));
    }

    #[test]
    fn unknown_users_read_offline() {
        let hub = quiet_hub(8);
        let presence = hub.presence("ghost");
        assert!(!presence.online);
        assert_eq!(presence.last_seen_unix(), 0);
        assert_eq!(hub.connection_count("ghost"), 0);
    }
}

//! Shared fixtures for handler and dispatcher tests: a canned-data
//! [`ConversationStore`] and helpers for minting tokens and app state, so
//! none of it needs Postgres or a real identity service.

use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use std::sync::{Arc, Mutex};

use crate::auth::claims::AccessClaims;
use hub::{Hub, HubConfig, PresenceAudience};
use service::config::Config;
use service::AppState;
use store::error::{Error, StoreErrorKind};
use store::{conversations, messages, ConversationStore, Id};

pub(crate) const TEST_SECRET: &str = "test-secret";

/// In-memory [`ConversationStore`] that records calls and serves canned
/// rows.
#[derive(Default)]
pub(crate) struct StubStore {
    /// Participant set returned for any conversation id.
    pub(crate) peers: Vec<Id>,
    /// When set, participant lookups fail with `RecordNotFound`.
    pub(crate) missing_conversation: bool,
    /// When set, `create_message` fails with `SystemError` instead of
    /// saving.
    pub(crate) fail_create: bool,
    /// When set, `update_last_read` fails with `SystemError`.
    pub(crate) fail_update_last_read: bool,
    /// Every (conversation_id, sender_id, body) passed to `create_message`.
    pub(crate) created: Mutex<Vec<(Id, Id, String)>>,
    /// Every (conversation_id, user_id) passed to `update_last_read`.
    pub(crate) read_marks: Mutex<Vec<(Id, Id)>>,
    /// Rows served by `list_conversations`.
    pub(crate) conversation_rows: Vec<conversations::Model>,
    /// Rows served by `list_messages`, newest first like the real store.
    pub(crate) message_rows: Vec<messages::Model>,
}

impl StubStore {
    pub(crate) fn with_peers(peers: &[&str]) -> Self {
        Self {
            peers: peers.iter().map(|peer| peer.to_string()).collect(),
            ..Self::default()
        }
    }
}

#[async_trait]
impl ConversationStore for StubStore {
    async fn resolve_peers(&self, _conversation_id: &str) -> Result<Vec<Id>, Error> {
        if self.missing_conversation {
            return Err(StoreErrorKind::RecordNotFound.into());
        }
        Ok(self.peers.clone())
    }

    async fn create_message(
        &self,
        conversation_id: &str,
        sender_id: &str,
        body: &str,
    ) -> Result<messages::Model, Error> {
        if body.is_empty() {
            return Err(StoreErrorKind::ValidationError.into());
        }
        if self.fail_create {
            return Err(StoreErrorKind::SystemError.into());
        }
        self.created.lock().unwrap().push((
            conversation_id.to_string(),
            sender_id.to_string(),
            body.to_string(),
        ));
        Ok(message_row("m-new", conversation_id, sender_id, body))
    }

    async fn update_last_read(
        &self,
        conversation_id: &str,
        user_id: &str,
        _read_at: chrono::DateTime<Utc>,
    ) -> Result<(), Error> {
        if self.fail_update_last_read {
            return Err(StoreErrorKind::SystemError.into());
        }
        self.read_marks
            .lock()
            .unwrap()
            .push((conversation_id.to_string(), user_id.to_string()));
        Ok(())
    }

    async fn direct_conversation(
        &self,
        _user_a: &str,
        _user_b: &str,
    ) -> Result<conversations::Model, Error> {
        if self.missing_conversation {
            return Err(StoreErrorKind::RecordNotFound.into());
        }
        Ok(conversation_row("c-direct"))
    }

    async fn list_conversations(
        &self,
        _user_id: &str,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<conversations::Model>, Error> {
        Ok(page(&self.conversation_rows, limit, offset))
    }

    async fn list_messages(
        &self,
        _conversation_id: &str,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<messages::Model>, Error> {
        Ok(page(&self.message_rows, limit, offset))
    }
}

fn page<T: Clone>(rows: &[T], limit: u64, offset: u64) -> Vec<T> {
    rows.iter()
        .skip(offset as usize)
        .take(limit as usize)
        .cloned()
        .collect()
}

pub(crate) fn conversation_row(id: &str) -> conversations::Model {
    conversations::Model {
        id: id.to_string(),
        created_at: Utc::now().into(),
        updated_at: Utc::now().into(),
    }
}

pub(crate) fn message_row(
    id: &str,
    conversation_id: &str,
    sender_id: &str,
    body: &str,
) -> messages::Model {
    messages::Model {
        id: id.to_string(),
        conversation_id: conversation_id.to_string(),
        sender_id: sender_id.to_string(),
        body: body.to_string(),
        created_at: Utc::now().into(),
    }
}

/// App state over a quiet hub (no presence chatter) and the given stub.
pub(crate) fn app_state(store: StubStore) -> AppState {
    app_state_with(Arc::new(store))
}

/// Same as [`app_state`], for tests that keep their own handle on the stub.
pub(crate) fn app_state_with(store: Arc<StubStore>) -> AppState {
    let config = Config::default().set_jwt_secret(TEST_SECRET.to_string());
    let hub = Arc::new(Hub::new(HubConfig {
        send_queue_capacity: 16,
        presence_audience: PresenceAudience::None,
    }));
    AppState::new(config, hub, store)
}

/// Mints a token signed with [`TEST_SECRET`].
pub(crate) fn mint_token(sub: &str, token_type: &str, exp_offset_secs: i64) -> String {
    let claims = AccessClaims {
        sub: sub.to_string(),
        token_type: token_type.to_string(),
        exp: (Utc::now().timestamp() + exp_offset_secs) as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .expect("failed to mint a test token")
}

/// `Authorization` header value carrying a fresh access token for `sub`.
pub(crate) fn bearer(sub: &str) -> String {
    format!("Bearer {}", mint_token(sub, "access", 3600))
}

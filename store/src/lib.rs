//! Persistence for conversations and messages, backed by SeaORM on Postgres.
//!
//! Everything chat-related lives in the `chat_hub` schema. Row identifiers
//! are UUIDs rendered as strings; the wider platform treats user and
//! conversation ids as opaque and this crate never parses them.

use uuid::Uuid;

pub mod prelude;

pub mod conversation_participants;
pub mod conversations;
pub mod error;
pub mod messages;

mod conversation_store;

pub use conversation_store::{ConversationStore, SeaOrmStore};
pub use error::{Error, StoreErrorKind};

/// A type alias that represents any chat row's id field data type.
/// Aliased so that it's easy to change the underlying type if necessary.
pub type Id = String;

pub(crate) fn new_id() -> Id {
    Uuid::new_v4().to_string()
}

use crate::error::{Error, StoreErrorKind};
use crate::prelude::{ConversationParticipants, Conversations, Messages};
use crate::{conversation_participants, conversations, messages, new_id, Id};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    entity::prelude::*, sea_query::Expr, ActiveValue::Set, DatabaseConnection, QueryOrder,
    QuerySelect,
};
use std::sync::Arc;

use log::*;

/// Storage operations the event dispatcher and the REST controllers need.
///
/// Kept narrow so frame handling can be tested against a stub without a
/// database behind it.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// All participant user ids of a conversation, the caller included.
    /// Fails with `RecordNotFound` when the conversation does not exist.
    async fn resolve_peers(&self, conversation_id: &str) -> Result<Vec<Id>, Error>;

    /// Persists one message and bumps the conversation's recency stamp.
    /// An empty body fails with `ValidationError` before touching the
    /// database.
    async fn create_message(
        &self,
        conversation_id: &str,
        sender_id: &str,
        body: &str,
    ) -> Result<messages::Model, Error>;

    /// Moves a participant's read marker. Succeeds even when no matching
    /// participant row exists.
    async fn update_last_read(
        &self,
        conversation_id: &str,
        user_id: &str,
        read_at: DateTime<Utc>,
    ) -> Result<(), Error>;

    /// The most recently active conversation both users participate in,
    /// created together with its two participant rows on first contact.
    async fn direct_conversation(
        &self,
        user_a: &str,
        user_b: &str,
    ) -> Result<conversations::Model, Error>;

    /// Conversations the user participates in, most recently active first.
    async fn list_conversations(
        &self,
        user_id: &str,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<conversations::Model>, Error>;

    /// One page of a conversation's messages, newest first.
    async fn list_messages(
        &self,
        conversation_id: &str,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<messages::Model>, Error>;
}

/// SeaORM-backed [`ConversationStore`].
pub struct SeaOrmStore {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ConversationStore for SeaOrmStore {
    async fn resolve_peers(&self, conversation_id: &str) -> Result<Vec<Id>, Error> {
        let conversation = Conversations::find_by_id(conversation_id.to_owned())
            .one(self.db.as_ref())
            .await?;
        if conversation.is_none() {
            debug!("Conversation with id {} not found", conversation_id);
            return Err(Error {
                source: None,
                error_kind: StoreErrorKind::RecordNotFound,
            });
        }

        let participants = ConversationParticipants::find()
            .filter(conversation_participants::Column::ConversationId.eq(conversation_id))
            .all(self.db.as_ref())
            .await?;

        Ok(participants
            .into_iter()
            .map(|participant| participant.user_id)
            .collect())
    }

    async fn create_message(
        &self,
        conversation_id: &str,
        sender_id: &str,
        body: &str,
    ) -> Result<messages::Model, Error> {
        if body.is_empty() {
            return Err(Error {
                source: None,
                error_kind: StoreErrorKind::ValidationError,
            });
        }

        let now: DateTimeWithTimeZone = Utc::now().into();

        let message = messages::ActiveModel {
            id: Set(new_id()),
            conversation_id: Set(conversation_id.to_owned()),
            sender_id: Set(sender_id.to_owned()),
            body: Set(body.to_owned()),
            created_at: Set(now),
        }
        .insert(self.db.as_ref())
        .await?;

        // The recency stamp drives conversation list ordering
        Conversations::update_many()
            .col_expr(conversations::Column::UpdatedAt, Expr::value(now))
            .filter(conversations::Column::Id.eq(conversation_id))
            .exec(self.db.as_ref())
            .await?;

        Ok(message)
    }

    async fn update_last_read(
        &self,
        conversation_id: &str,
        user_id: &str,
        read_at: DateTime<Utc>,
    ) -> Result<(), Error> {
        let read_at: DateTimeWithTimeZone = read_at.into();

        ConversationParticipants::update_many()
            .col_expr(
                conversation_participants::Column::LastReadAt,
                Expr::value(read_at),
            )
            .filter(conversation_participants::Column::ConversationId.eq(conversation_id))
            .filter(conversation_participants::Column::UserId.eq(user_id))
            .exec(self.db.as_ref())
            .await?;

        Ok(())
    }

    async fn direct_conversation(
        &self,
        user_a: &str,
        user_b: &str,
    ) -> Result<conversations::Model, Error> {
        let a_conversation_ids: Vec<Id> = ConversationParticipants::find()
            .filter(conversation_participants::Column::UserId.eq(user_a))
            .all(self.db.as_ref())
            .await?
            .into_iter()
            .map(|participant| participant.conversation_id)
            .collect();

        if !a_conversation_ids.is_empty() {
            let shared_ids: Vec<Id> = ConversationParticipants::find()
                .filter(conversation_participants::Column::UserId.eq(user_b))
                .filter(
                    conversation_participants::Column::ConversationId.is_in(a_conversation_ids),
                )
                .all(self.db.as_ref())
                .await?
                .into_iter()
                .map(|participant| participant.conversation_id)
                .collect();

            if !shared_ids.is_empty() {
                let existing = Conversations::find()
                    .filter(conversations::Column::Id.is_in(shared_ids))
                    .order_by_desc(conversations::Column::UpdatedAt)
                    .one(self.db.as_ref())
                    .await?;

                if let Some(conversation) = existing {
                    return Ok(conversation);
                }
            }
        }

        debug!(
            "No direct conversation between {} and {}, creating one",
            user_a, user_b
        );

        let now: DateTimeWithTimeZone = Utc::now().into();

        let conversation = conversations::ActiveModel {
            id: Set(new_id()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(self.db.as_ref())
        .await?;

        for user_id in [user_a, user_b] {
            conversation_participants::ActiveModel {
                id: Set(new_id()),
                conversation_id: Set(conversation.id.clone()),
                user_id: Set(user_id.to_owned()),
                joined_at: Set(now),
                last_read_at: Set(None),
            }
            .insert(self.db.as_ref())
            .await?;
        }

        Ok(conversation)
    }

    async fn list_conversations(
        &self,
        user_id: &str,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<conversations::Model>, Error> {
        let conversation_ids: Vec<Id> = ConversationParticipants::find()
            .filter(conversation_participants::Column::UserId.eq(user_id))
            .all(self.db.as_ref())
            .await?
            .into_iter()
            .map(|participant| participant.conversation_id)
            .collect();

        if conversation_ids.is_empty() {
            return Ok(Vec::new());
        }

        Ok(Conversations::find()
            .filter(conversations::Column::Id.is_in(conversation_ids))
            .order_by_desc(conversations::Column::UpdatedAt)
            .limit(limit)
            .offset(offset)
            .all(self.db.as_ref())
            .await?)
    }

    async fn list_messages(
        &self,
        conversation_id: &str,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<messages::Model>, Error> {
        Ok(Messages::find()
            .filter(messages::Column::ConversationId.eq(conversation_id))
            .order_by_desc(messages::Column::CreatedAt)
            .limit(limit)
            .offset(offset)
            .all(self.db.as_ref())
            .await?)
    }
}

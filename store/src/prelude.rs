pub use super::conversation_participants::Entity as ConversationParticipants;
pub use super::conversations::Entity as Conversations;
pub use super::messages::Entity as Messages;

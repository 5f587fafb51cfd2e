use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create indexes for conversations table
        manager
            .create_index(
                Index::create()
                    .name("conversations_updated_at")
                    .table((Alias::new("chat_hub"), Alias::new("conversations")))
                    .col(Alias::new("updated_at"))
                    .to_owned(),
            )
            .await?;

        // Create indexes for conversation_participants table
        manager
            .create_index(
                Index::create()
                    .name("conversation_participants_conversation_id")
                    .table((
                        Alias::new("chat_hub"),
                        Alias::new("conversation_participants"),
                    ))
                    .col(Alias::new("conversation_id"))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("conversation_participants_user_id")
                    .table((
                        Alias::new("chat_hub"),
                        Alias::new("conversation_participants"),
                    ))
                    .col(Alias::new("user_id"))
                    .to_owned(),
            )
            .await?;

        // Create indexes for messages table
        // Note: Indexing on body field is omitted as it's likely to contain long text
        manager
            .create_index(
                Index::create()
                    .name("messages_conversation_id_created_at")
                    .table((Alias::new("chat_hub"), Alias::new("messages")))
                    .col(Alias::new("conversation_id"))
                    .col(Alias::new("created_at"))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("messages_sender_id")
                    .table((Alias::new("chat_hub"), Alias::new("messages")))
                    .col(Alias::new("sender_id"))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop indexes for messages table
        manager
            .drop_index(
                Index::drop()
                    .name("messages_sender_id")
                    .table((Alias::new("chat_hub"), Alias::new("messages")))
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("messages_conversation_id_created_at")
                    .table((Alias::new("chat_hub"), Alias::new("messages")))
                    .to_owned(),
            )
            .await?;

        // Drop indexes for conversation_participants table
        manager
            .drop_index(
                Index::drop()
                    .name("conversation_participants_user_id")
                    .table((
                        Alias::new("chat_hub"),
                        Alias::new("conversation_participants"),
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("conversation_participants_conversation_id")
                    .table((
                        Alias::new("chat_hub"),
                        Alias::new("conversation_participants"),
                    ))
                    .to_owned(),
            )
            .await?;

        // Drop indexes for conversations table
        manager
            .drop_index(
                Index::drop()
                    .name("conversations_updated_at")
                    .table((Alias::new("chat_hub"), Alias::new("conversations")))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}

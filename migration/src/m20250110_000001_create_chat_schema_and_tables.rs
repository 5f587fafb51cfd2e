use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create the chat hub's schema
        manager
            .get_connection()
            .execute_unprepared("CREATE SCHEMA IF NOT EXISTS chat_hub;")
            .await?;

        manager
            .get_connection()
            .execute_unprepared("SET search_path TO chat_hub, public;")
            .await?;

        // Conversations carry no membership themselves; participants are rows
        // in conversation_participants. updated_at is bumped on every new
        // message so conversation lists sort by activity.
        let create_conversations_sql = r#"
            CREATE TABLE IF NOT EXISTS chat_hub.conversations (
                id VARCHAR(36) PRIMARY KEY,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
        "#;

        manager
            .get_connection()
            .execute_unprepared(create_conversations_sql)
            .await?;

        // last_read_at is NULL until the participant first marks the
        // conversation read.
        let create_participants_sql = r#"
            CREATE TABLE IF NOT EXISTS chat_hub.conversation_participants (
                id VARCHAR(36) PRIMARY KEY,
                conversation_id VARCHAR(36) NOT NULL
                    REFERENCES chat_hub.conversations(id) ON DELETE CASCADE,
                user_id VARCHAR(255) NOT NULL,

                joined_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                last_read_at TIMESTAMPTZ
            )
        "#;

        manager
            .get_connection()
            .execute_unprepared(create_participants_sql)
            .await?;

        let create_messages_sql = r#"
            CREATE TABLE IF NOT EXISTS chat_hub.messages (
                id VARCHAR(36) PRIMARY KEY,
                conversation_id VARCHAR(36) NOT NULL
                    REFERENCES chat_hub.conversations(id) ON DELETE CASCADE,
                sender_id VARCHAR(255) NOT NULL,

                body TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
        "#;

        manager
            .get_connection()
            .execute_unprepared(create_messages_sql)
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS chat_hub.messages")
            .await?;

        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS chat_hub.conversation_participants")
            .await?;

        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS chat_hub.conversations")
            .await?;

        // Drop the schema (CASCADE will remove all objects in it)
        manager
            .get_connection()
            .execute_unprepared("DROP SCHEMA IF EXISTS chat_hub CASCADE;")
            .await?;

        Ok(())
    }
}

use uuid::Uuid;

use crate::{
    api::error,
    modules::message::{
        model::InsertMessage,
        repository::{MessageRepository, ReactionRepository},
        schema::{MessageEntity, MessageReactionEntity},
    },
};

#[derive(Clone)]
pub struct MessageRepositoryPg {
    pool: sqlx::PgPool,
}

impl MessageRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl MessageRepository for MessageRepositoryPg {
    fn get_pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }

    async fn create<'e, E>(
        &self,
        message: &InsertMessage,
        tx: E,
    ) -> Result<MessageEntity, error::SystemError>
    where
        E: sqlx::Executor<'e, Database = sqlx::Postgres>,
    {
        let id = Uuid::now_v7();
        let entity = sqlx::query_as::<_, MessageEntity>(
            r#"
            INSERT INTO messages (id, conversation_id, sender_id, content, type, reply_to_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(message.conversation_id)
        .bind(message.sender_id)
        .bind(&message.content)
        .bind(&message._type)
        .bind(message.reply_to_id)
        .fetch_one(tx)
        .await?;

        Ok(entity)
    }

    async fn find_by_id<'e, E>(
        &self,
        message_id: &Uuid,
        tx: E,
    ) -> Result<Option<MessageEntity>, error::SystemError>
    where
        E: sqlx::Executor<'e, Database = sqlx::Postgres>,
    {
        let message = sqlx::query_as::<_, MessageEntity>("SELECT * FROM messages WHERE id = $1")
            .bind(message_id)
            .fetch_optional(tx)
            .await?;

        Ok(message)
    }

    async fn find_by_conversation(
        &self,
        conversation_id: &Uuid,
    ) -> Result<Vec<MessageEntity>, error::SystemError> {
        let messages = sqlx::query_as::<_, MessageEntity>(
            "SELECT * FROM messages WHERE conversation_id = $1 ORDER BY created_at ASC",
        )
        .bind(conversation_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(messages)
    }

    async fn find_page(
        &self,
        conversation_id: &Uuid,
        before: Option<chrono::DateTime<chrono::Utc>>,
        limit: i64,
    ) -> Result<Vec<MessageEntity>, error::SystemError> {
        // index on (conversation_id, created_at) keeps this a range scan
        let messages = if let Some(before) = before {
            sqlx::query_as::<_, MessageEntity>(
                r#"
                SELECT * FROM messages
                WHERE conversation_id = $1
                AND created_at < $2
                ORDER BY created_at DESC
                LIMIT $3
                "#,
            )
            .bind(conversation_id)
            .bind(before)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?
        } else {
            sqlx::query_as::<_, MessageEntity>(
                r#"
                SELECT * FROM messages
                WHERE conversation_id = $1
                ORDER BY created_at DESC
                LIMIT $2
                "#,
            )
            .bind(conversation_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?
        };

        Ok(messages)
    }

    async fn update_content<'e, E>(
        &self,
        message_id: &Uuid,
        content: &str,
        tx: E,
    ) -> Result<Option<MessageEntity>, error::SystemError>
    where
        E: sqlx::Executor<'e, Database = sqlx::Postgres>,
    {
        let message = sqlx::query_as::<_, MessageEntity>(
            r#"
            UPDATE messages
            SET content = $2, is_edited = TRUE
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(message_id)
        .bind(content)
        .fetch_optional(tx)
        .await?;

        Ok(message)
    }

    async fn delete<'e, E>(
        &self,
        message_id: &Uuid,
        tx: E,
    ) -> Result<bool, error::SystemError>
    where
        E: sqlx::Executor<'e, Database = sqlx::Postgres>,
    {
        let rows = sqlx::query("DELETE FROM messages WHERE id = $1")
            .bind(message_id)
            .execute(tx)
            .await?
            .rows_affected();

        Ok(rows > 0)
    }

    async fn search(
        &self,
        conversation_id: &Uuid,
        pattern: &str,
    ) -> Result<Vec<MessageEntity>, error::SystemError> {
        let messages = sqlx::query_as::<_, MessageEntity>(
            r#"
            SELECT * FROM messages
            WHERE conversation_id = $1
            AND content ILIKE $2
            ORDER BY created_at ASC
            "#,
        )
        .bind(conversation_id)
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(messages)
    }
}

#[derive(Clone)]
pub struct ReactionRepositoryPg {
    pool: sqlx::PgPool,
}

impl ReactionRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ReactionRepository for ReactionRepositoryPg {
    async fn toggle(
        &self,
        message_id: &Uuid,
        user_id: &Uuid,
        emoji: &str,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> Result<bool, error::SystemError> {
        // the composite primary key settles concurrent togglers: the insert
        // either wins or hits the existing row, which is then removed
        let inserted = sqlx::query(
            r#"
            INSERT INTO message_reactions (message_id, user_id, emoji)
            VALUES ($1, $2, $3)
            ON CONFLICT (message_id, user_id, emoji) DO NOTHING
            "#,
        )
        .bind(message_id)
        .bind(user_id)
        .bind(emoji)
        .execute(tx.as_mut())
        .await?
        .rows_affected();

        if inserted > 0 {
            return Ok(true);
        }

        sqlx::query(
            "DELETE FROM message_reactions WHERE message_id = $1 AND user_id = $2 AND emoji = $3",
        )
        .bind(message_id)
        .bind(user_id)
        .bind(emoji)
        .execute(tx.as_mut())
        .await?;

        Ok(false)
    }

    async fn find_for_message<'e, E>(
        &self,
        message_id: &Uuid,
        tx: E,
    ) -> Result<Vec<MessageReactionEntity>, error::SystemError>
    where
        E: sqlx::Executor<'e, Database = sqlx::Postgres>,
    {
        let reactions = sqlx::query_as::<_, MessageReactionEntity>(
            "SELECT * FROM message_reactions WHERE message_id = $1 ORDER BY created_at ASC",
        )
        .bind(message_id)
        .fetch_all(tx)
        .await?;

        Ok(reactions)
    }

    async fn find_for_messages(
        &self,
        message_ids: &[Uuid],
    ) -> Result<Vec<MessageReactionEntity>, error::SystemError> {
        let reactions = sqlx::query_as::<_, MessageReactionEntity>(
            r#"
            SELECT * FROM message_reactions
            WHERE message_id = ANY($1)
            ORDER BY created_at ASC
            "#,
        )
        .bind(message_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(reactions)
    }
}

use uuid::Uuid;

use crate::api::error;
use crate::modules::message::model::InsertMessage;
use crate::modules::message::schema::{MessageEntity, MessageReactionEntity};

#[async_trait::async_trait]
pub trait MessageRepository {
    fn get_pool(&self) -> &sqlx::Pool<sqlx::Postgres>;

    async fn create<'e, E>(
        &self,
        message: &InsertMessage,
        tx: E,
    ) -> Result<MessageEntity, error::SystemError>
    where
        E: sqlx::Executor<'e, Database = sqlx::Postgres>;

    async fn find_by_id<'e, E>(
        &self,
        message_id: &Uuid,
        tx: E,
    ) -> Result<Option<MessageEntity>, error::SystemError>
    where
        E: sqlx::Executor<'e, Database = sqlx::Postgres>;

    /// Full ascending history for live display.
    async fn find_by_conversation(
        &self,
        conversation_id: &Uuid,
    ) -> Result<Vec<MessageEntity>, error::SystemError>;

    /// Backward page: up to `limit` rows older than `before`, newest first.
    async fn find_page(
        &self,
        conversation_id: &Uuid,
        before: Option<chrono::DateTime<chrono::Utc>>,
        limit: i64,
    ) -> Result<Vec<MessageEntity>, error::SystemError>;

    async fn update_content<'e, E>(
        &self,
        message_id: &Uuid,
        content: &str,
        tx: E,
    ) -> Result<Option<MessageEntity>, error::SystemError>
    where
        E: sqlx::Executor<'e, Database = sqlx::Postgres>;

    /// Hard delete; reactions cascade, replies null out.
    async fn delete<'e, E>(
        &self,
        message_id: &Uuid,
        tx: E,
    ) -> Result<bool, error::SystemError>
    where
        E: sqlx::Executor<'e, Database = sqlx::Postgres>;

    /// Case-insensitive substring match over content, ascending.
    async fn search(
        &self,
        conversation_id: &Uuid,
        pattern: &str,
    ) -> Result<Vec<MessageEntity>, error::SystemError>;
}

#[async_trait::async_trait]
pub trait ReactionRepository {
    /// Toggle semantics: insert the (message, user, emoji) row if absent,
    /// delete it if present. Returns true when the reaction was added.
    async fn toggle(
        &self,
        message_id: &Uuid,
        user_id: &Uuid,
        emoji: &str,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> Result<bool, error::SystemError>;

    async fn find_for_message<'e, E>(
        &self,
        message_id: &Uuid,
        tx: E,
    ) -> Result<Vec<MessageReactionEntity>, error::SystemError>
    where
        E: sqlx::Executor<'e, Database = sqlx::Postgres>;

    async fn find_for_messages(
        &self,
        message_ids: &[Uuid],
    ) -> Result<Vec<MessageReactionEntity>, error::SystemError>;
}

use uuid::Uuid;

use crate::api::error;
use crate::modules::notification::model::{NewNotification, NotificationRow};
use crate::modules::notification::schema::NotificationEntity;

#[async_trait::async_trait]
pub trait NotificationRepository {
    fn get_pool(&self) -> &sqlx::Pool<sqlx::Postgres>;

    /// Insert one notification. Always called inside the transaction of the
    /// mutation it is a side effect of.
    async fn create<'e, E>(
        &self,
        notification: &NewNotification,
        tx: E,
    ) -> Result<NotificationEntity, error::SystemError>
    where
        E: sqlx::Executor<'e, Database = sqlx::Postgres>;

    /// Unread rows newest first, enriched with sender, conversation, the
    /// other participant of direct conversations, and the friend request.
    async fn find_unread(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<NotificationRow>, error::SystemError>;

    /// Most recent rows regardless of read state, same enrichment minus the
    /// other-participant derivation.
    async fn find_recent(
        &self,
        user_id: &Uuid,
        limit: i64,
    ) -> Result<Vec<NotificationRow>, error::SystemError>;

    async fn mark_read(&self, notification_id: &Uuid) -> Result<bool, error::SystemError>;

    async fn mark_all_read(&self, user_id: &Uuid) -> Result<u64, error::SystemError>;

    /// Mark the recipient's notifications for one friend request read
    /// (accept and decline both land here).
    async fn mark_read_for_friend_request<'e, E>(
        &self,
        request_id: &Uuid,
        user_id: &Uuid,
        tx: E,
    ) -> Result<u64, error::SystemError>
    where
        E: sqlx::Executor<'e, Database = sqlx::Postgres>;

    /// Mark a user's group-invite notifications for one conversation read
    /// (accept and decline both land here).
    async fn mark_read_for_group_invite<'e, E>(
        &self,
        conversation_id: &Uuid,
        user_id: &Uuid,
        tx: E,
    ) -> Result<u64, error::SystemError>
    where
        E: sqlx::Executor<'e, Database = sqlx::Postgres>;

    async fn delete(&self, notification_id: &Uuid) -> Result<bool, error::SystemError>;

    async fn unread_count(&self, user_id: &Uuid) -> Result<i64, error::SystemError>;
}

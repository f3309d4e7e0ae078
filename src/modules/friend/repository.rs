use uuid::Uuid;

use crate::api::error;
use crate::modules::friend::model::{FriendRequestUserRow, FriendResponse};
use crate::modules::friend::schema::{FriendRequestEntity, FriendRequestStatus};

#[async_trait::async_trait]
pub trait FriendRequestRepository {
    fn get_pool(&self) -> &sqlx::Pool<sqlx::Postgres>;

    /// Lookup by the ordered (sender, recipient) pair, any status.
    async fn find_pair<'e, E>(
        &self,
        sender_id: &Uuid,
        recipient_id: &Uuid,
        tx: E,
    ) -> Result<Option<FriendRequestEntity>, error::SystemError>
    where
        E: sqlx::Executor<'e, Database = sqlx::Postgres>;

    async fn find_accepted_between(
        &self,
        user_a: &Uuid,
        user_b: &Uuid,
    ) -> Result<Option<FriendRequestEntity>, error::SystemError>;

    /// Row-locked fetch for the accept/decline precondition check.
    async fn find_by_id_for_update(
        &self,
        request_id: &Uuid,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> Result<Option<FriendRequestEntity>, error::SystemError>;

    async fn create<'e, E>(
        &self,
        sender_id: &Uuid,
        recipient_id: &Uuid,
        tx: E,
    ) -> Result<FriendRequestEntity, error::SystemError>
    where
        E: sqlx::Executor<'e, Database = sqlx::Postgres>;

    /// Remove declined rows between the two users (either direction) so a
    /// fresh request supersedes them.
    async fn delete_declined_between<'e, E>(
        &self,
        user_a: &Uuid,
        user_b: &Uuid,
        tx: E,
    ) -> Result<u64, error::SystemError>
    where
        E: sqlx::Executor<'e, Database = sqlx::Postgres>;

    async fn set_status<'e, E>(
        &self,
        request_id: &Uuid,
        status: FriendRequestStatus,
        tx: E,
    ) -> Result<FriendRequestEntity, error::SystemError>
    where
        E: sqlx::Executor<'e, Database = sqlx::Postgres>;

    async fn find_pending_to_user(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<FriendRequestUserRow>, error::SystemError>;

    async fn find_pending_from_user(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<FriendRequestUserRow>, error::SystemError>;

    /// Derived friends list: accepted requests in either direction, joined
    /// to the counterpart's profile.
    async fn find_friends(&self, user_id: &Uuid)
    -> Result<Vec<FriendResponse>, error::SystemError>;
}

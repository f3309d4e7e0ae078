use uuid::Uuid;

use crate::{
    api::error,
    modules::friend::{
        model::{FriendRequestUserRow, FriendResponse},
        repository::FriendRequestRepository,
        schema::{FriendRequestEntity, FriendRequestStatus},
    },
};

#[derive(Clone)]
pub struct FriendRequestRepositoryPg {
    pool: sqlx::PgPool,
}

impl FriendRequestRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl FriendRequestRepository for FriendRequestRepositoryPg {
    fn get_pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }

    async fn find_pair<'e, E>(
        &self,
        sender_id: &Uuid,
        recipient_id: &Uuid,
        tx: E,
    ) -> Result<Option<FriendRequestEntity>, error::SystemError>
    where
        E: sqlx::Executor<'e, Database = sqlx::Postgres>,
    {
        let request = sqlx::query_as::<_, FriendRequestEntity>(
            "SELECT * FROM friend_requests WHERE sender_id = $1 AND recipient_id = $2",
        )
        .bind(sender_id)
        .bind(recipient_id)
        .fetch_optional(tx)
        .await?;

        Ok(request)
    }

    async fn find_accepted_between(
        &self,
        user_a: &Uuid,
        user_b: &Uuid,
    ) -> Result<Option<FriendRequestEntity>, error::SystemError> {
        let request = sqlx::query_as::<_, FriendRequestEntity>(
            r#"
            SELECT *
            FROM friend_requests
            WHERE status = 'accepted'
            AND (
                   (sender_id = $1 AND recipient_id = $2)
                OR (sender_id = $2 AND recipient_id = $1)
            )
            "#,
        )
        .bind(user_a)
        .bind(user_b)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }

    async fn find_by_id_for_update(
        &self,
        request_id: &Uuid,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> Result<Option<FriendRequestEntity>, error::SystemError> {
        let request = sqlx::query_as::<_, FriendRequestEntity>(
            "SELECT * FROM friend_requests WHERE id = $1 FOR UPDATE",
        )
        .bind(request_id)
        .fetch_optional(tx.as_mut())
        .await?;

        Ok(request)
    }

    async fn create<'e, E>(
        &self,
        sender_id: &Uuid,
        recipient_id: &Uuid,
        tx: E,
    ) -> Result<FriendRequestEntity, error::SystemError>
    where
        E: sqlx::Executor<'e, Database = sqlx::Postgres>,
    {
        let id = Uuid::now_v7();
        let request = sqlx::query_as::<_, FriendRequestEntity>(
            r#"
            INSERT INTO friend_requests (id, sender_id, recipient_id, status)
            VALUES ($1, $2, $3, 'pending')
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(sender_id)
        .bind(recipient_id)
        .fetch_one(tx)
        .await?;

        Ok(request)
    }

    async fn delete_declined_between<'e, E>(
        &self,
        user_a: &Uuid,
        user_b: &Uuid,
        tx: E,
    ) -> Result<u64, error::SystemError>
    where
        E: sqlx::Executor<'e, Database = sqlx::Postgres>,
    {
        let rows = sqlx::query(
            r#"
            DELETE FROM friend_requests
            WHERE status = 'declined'
            AND (
                   (sender_id = $1 AND recipient_id = $2)
                OR (sender_id = $2 AND recipient_id = $1)
            )
            "#,
        )
        .bind(user_a)
        .bind(user_b)
        .execute(tx)
        .await?
        .rows_affected();

        Ok(rows)
    }

    async fn set_status<'e, E>(
        &self,
        request_id: &Uuid,
        status: FriendRequestStatus,
        tx: E,
    ) -> Result<FriendRequestEntity, error::SystemError>
    where
        E: sqlx::Executor<'e, Database = sqlx::Postgres>,
    {
        let request = sqlx::query_as::<_, FriendRequestEntity>(
            r#"
            UPDATE friend_requests
            SET status = $2, responded_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(request_id)
        .bind(status)
        .fetch_optional(tx)
        .await?
        .ok_or_else(|| error::SystemError::not_found("Friend request not found"))?;

        Ok(request)
    }

    async fn find_pending_to_user(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<FriendRequestUserRow>, error::SystemError> {
        let rows = sqlx::query_as::<_, FriendRequestUserRow>(
            r#"
            SELECT
                fr.id AS req_id,
                u.id AS user_id,
                u.display_name,
                u.avatar_url,
                u.is_online,
                u.last_seen,
                fr.created_at
            FROM friend_requests fr
            JOIN users u
                ON fr.sender_id = u.id
            WHERE fr.recipient_id = $1
            AND fr.status = 'pending'
            ORDER BY fr.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn find_pending_from_user(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<FriendRequestUserRow>, error::SystemError> {
        let rows = sqlx::query_as::<_, FriendRequestUserRow>(
            r#"
            SELECT
                fr.id AS req_id,
                u.id AS user_id,
                u.display_name,
                u.avatar_url,
                u.is_online,
                u.last_seen,
                fr.created_at
            FROM friend_requests fr
            JOIN users u
                ON fr.recipient_id = u.id
            WHERE fr.sender_id = $1
            AND fr.status = 'pending'
            ORDER BY fr.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn find_friends(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<FriendResponse>, error::SystemError> {
        let friends = sqlx::query_as::<_, FriendResponse>(
            r#"
            SELECT
                u.id,
                u.display_name,
                u.avatar_url,
                u.is_online,
                u.last_seen
            FROM friend_requests fr
            JOIN users u
                ON u.id = CASE
                    WHEN fr.sender_id = $1 THEN fr.recipient_id
                    ELSE fr.sender_id
                END
            WHERE fr.status = 'accepted'
            AND (fr.sender_id = $1 OR fr.recipient_id = $1)
            ORDER BY u.display_name
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(friends)
    }
}

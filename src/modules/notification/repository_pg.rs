use uuid::Uuid;

use crate::{
    api::error,
    modules::notification::{
        model::{NewNotification, NotificationRow},
        repository::NotificationRepository,
        schema::NotificationEntity,
    },
};

#[derive(Clone)]
pub struct NotificationRepositoryPg {
    pool: sqlx::PgPool,
}

impl NotificationRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl NotificationRepository for NotificationRepositoryPg {
    fn get_pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }

    async fn create<'e, E>(
        &self,
        notification: &NewNotification,
        tx: E,
    ) -> Result<NotificationEntity, error::SystemError>
    where
        E: sqlx::Executor<'e, Database = sqlx::Postgres>,
    {
        let id = Uuid::now_v7();
        let entity = sqlx::query_as::<_, NotificationEntity>(
            r#"
            INSERT INTO notifications (id, user_id, type, sender_id, conversation_id, friend_request_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(notification.user_id)
        .bind(&notification._type)
        .bind(notification.sender_id)
        .bind(notification.conversation_id)
        .bind(notification.friend_request_id)
        .fetch_one(tx)
        .await?;

        Ok(entity)
    }

    async fn find_unread(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<NotificationRow>, error::SystemError> {
        // the other-participant join is constrained to direct conversations,
        // which have exactly two members, so it cannot fan rows out
        let rows = sqlx::query_as::<_, NotificationRow>(
            r#"
            SELECT
                n.id,
                n.type,
                n.sender_id,
                n.conversation_id,
                n.friend_request_id,
                n.is_read,
                n.created_at,

                s.display_name AS sender_display_name,
                s.avatar_url   AS sender_avatar_url,

                c.type AS conversation_type,
                c.name AS conversation_name,

                ou.id           AS other_user_id,
                ou.display_name AS other_user_display_name,
                ou.avatar_url   AS other_user_avatar_url,

                fr.status AS friend_request_status
            FROM notifications n
            JOIN users s ON s.id = n.sender_id
            LEFT JOIN conversations c ON c.id = n.conversation_id
            LEFT JOIN conversation_members cm
                ON cm.conversation_id = c.id
                AND cm.user_id <> n.user_id
                AND c.type = 'direct'
            LEFT JOIN users ou ON ou.id = cm.user_id
            LEFT JOIN friend_requests fr ON fr.id = n.friend_request_id
            WHERE n.user_id = $1
            AND NOT n.is_read
            ORDER BY n.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn find_recent(
        &self,
        user_id: &Uuid,
        limit: i64,
    ) -> Result<Vec<NotificationRow>, error::SystemError> {
        let rows = sqlx::query_as::<_, NotificationRow>(
            r#"
            SELECT
                n.id,
                n.type,
                n.sender_id,
                n.conversation_id,
                n.friend_request_id,
                n.is_read,
                n.created_at,

                s.display_name AS sender_display_name,
                s.avatar_url   AS sender_avatar_url,

                c.type AS conversation_type,
                c.name AS conversation_name,

                NULL::uuid AS other_user_id,
                NULL::text AS other_user_display_name,
                NULL::text AS other_user_avatar_url,

                fr.status AS friend_request_status
            FROM notifications n
            JOIN users s ON s.id = n.sender_id
            LEFT JOIN conversations c ON c.id = n.conversation_id
            LEFT JOIN friend_requests fr ON fr.id = n.friend_request_id
            WHERE n.user_id = $1
            ORDER BY n.created_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn mark_read(&self, notification_id: &Uuid) -> Result<bool, error::SystemError> {
        let rows = sqlx::query("UPDATE notifications SET is_read = TRUE WHERE id = $1")
            .bind(notification_id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows > 0)
    }

    async fn mark_all_read(&self, user_id: &Uuid) -> Result<u64, error::SystemError> {
        let rows =
            sqlx::query("UPDATE notifications SET is_read = TRUE WHERE user_id = $1 AND NOT is_read")
                .bind(user_id)
                .execute(&self.pool)
                .await?
                .rows_affected();

        Ok(rows)
    }

    async fn mark_read_for_friend_request<'e, E>(
        &self,
        request_id: &Uuid,
        user_id: &Uuid,
        tx: E,
    ) -> Result<u64, error::SystemError>
    where
        E: sqlx::Executor<'e, Database = sqlx::Postgres>,
    {
        let rows = sqlx::query(
            r#"
            UPDATE notifications
            SET is_read = TRUE
            WHERE friend_request_id = $1
            AND user_id = $2
            AND type = 'friend_request'
            "#,
        )
        .bind(request_id)
        .bind(user_id)
        .execute(tx)
        .await?
        .rows_affected();

        Ok(rows)
    }

    async fn mark_read_for_group_invite<'e, E>(
        &self,
        conversation_id: &Uuid,
        user_id: &Uuid,
        tx: E,
    ) -> Result<u64, error::SystemError>
    where
        E: sqlx::Executor<'e, Database = sqlx::Postgres>,
    {
        let rows = sqlx::query(
            r#"
            UPDATE notifications
            SET is_read = TRUE
            WHERE conversation_id = $1
            AND user_id = $2
            AND type = 'group_invite'
            "#,
        )
        .bind(conversation_id)
        .bind(user_id)
        .execute(tx)
        .await?
        .rows_affected();

        Ok(rows)
    }

    async fn delete(&self, notification_id: &Uuid) -> Result<bool, error::SystemError> {
        let rows = sqlx::query("DELETE FROM notifications WHERE id = $1")
            .bind(notification_id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows > 0)
    }

    async fn unread_count(&self, user_id: &Uuid) -> Result<i64, error::SystemError> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND NOT is_read",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.0)
    }
}

use uuid::Uuid;

use crate::modules::conversation::model::{ConversationRaw, MemberDetailRow};
use crate::modules::conversation::repository::{ConversationRepository, MemberRepository};
use crate::modules::conversation::schema::{ConversationEntity, ConversationMemberEntity};
use crate::{api::error, modules::conversation::schema::ConversationType};

#[derive(Clone)]
pub struct ConversationPgRepository {
    pool: sqlx::PgPool,
}

impl ConversationPgRepository {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }

    async fn create<'e, E>(
        &self,
        _type: &ConversationType,
        name: Option<&str>,
        creator_id: Option<&Uuid>,
        direct_key: Option<&str>,
        tx: E,
    ) -> Result<ConversationEntity, error::SystemError>
    where
        E: sqlx::Executor<'e, Database = sqlx::Postgres>,
    {
        let id = Uuid::now_v7();
        let conversation = sqlx::query_as::<_, ConversationEntity>(
            r#"
            INSERT INTO conversations (id, type, name, creator_id, direct_key)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(_type)
        .bind(name)
        .bind(creator_id)
        .bind(direct_key)
        .fetch_one(tx)
        .await?;

        Ok(conversation)
    }
}

#[async_trait::async_trait]
impl ConversationRepository for ConversationPgRepository {
    fn get_pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }

    async fn find_by_id<'e, E>(
        &self,
        conversation_id: &Uuid,
        tx: E,
    ) -> Result<Option<ConversationEntity>, error::SystemError>
    where
        E: sqlx::Executor<'e, Database = sqlx::Postgres>,
    {
        let conversation =
            sqlx::query_as::<_, ConversationEntity>("SELECT * FROM conversations WHERE id = $1")
                .bind(conversation_id)
                .fetch_optional(tx)
                .await?;

        Ok(conversation)
    }

    async fn find_by_direct_key(
        &self,
        key: &str,
    ) -> Result<Option<ConversationEntity>, error::SystemError> {
        let conversation = sqlx::query_as::<_, ConversationEntity>(
            "SELECT * FROM conversations WHERE direct_key = $1",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(conversation)
    }

    async fn create_direct(
        &self,
        user_a: &Uuid,
        user_b: &Uuid,
        direct_key: &str,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> Result<ConversationEntity, error::SystemError> {
        let conversation = self
            .create(&ConversationType::Direct, None, None, Some(direct_key), tx.as_mut())
            .await?;

        sqlx::query(
            r#"
            INSERT INTO conversation_members (conversation_id, user_id, state, joined_at)
            SELECT $1, unnest($2::uuid[]), 'joined', NOW()
            "#,
        )
        .bind(conversation.id)
        .bind(vec![*user_a, *user_b])
        .execute(tx.as_mut())
        .await?;

        Ok(conversation)
    }

    async fn create_group(
        &self,
        name: &str,
        creator_id: &Uuid,
        invited_ids: &[Uuid],
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> Result<ConversationEntity, error::SystemError> {
        let conversation = self
            .create(&ConversationType::Group, Some(name), Some(creator_id), None, tx.as_mut())
            .await?;

        sqlx::query(
            r#"
            INSERT INTO conversation_members (conversation_id, user_id, state, joined_at)
            VALUES ($1, $2, 'joined', NOW())
            "#,
        )
        .bind(conversation.id)
        .bind(creator_id)
        .execute(tx.as_mut())
        .await?;

        if !invited_ids.is_empty() {
            sqlx::query(
                r#"
                INSERT INTO conversation_members (conversation_id, user_id, state, invited_by)
                SELECT $1, unnest($2::uuid[]), 'invited', $3
                "#,
            )
            .bind(conversation.id)
            .bind(invited_ids)
            .bind(creator_id)
            .execute(tx.as_mut())
            .await?;
        }

        Ok(conversation)
    }

    async fn touch_last_message_at<'e, E>(
        &self,
        conversation_id: &Uuid,
        tx: E,
    ) -> Result<(), error::SystemError>
    where
        E: sqlx::Executor<'e, Database = sqlx::Postgres>,
    {
        sqlx::query("UPDATE conversations SET last_message_at = NOW() WHERE id = $1")
            .bind(conversation_id)
            .execute(tx)
            .await?;

        Ok(())
    }

    async fn find_all_by_user(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<ConversationRaw>, error::SystemError> {
        // pending invites surface in the list too: the member join is not
        // filtered on state
        let rows = sqlx::query_as::<_, ConversationRaw>(
            r#"
            SELECT
                c.id,
                c.type,
                c.name,
                c.creator_id,
                c.last_message_at,
                c.created_at,

                lm.content    AS last_content,
                lm.sender_id  AS last_sender_id,
                lm.created_at AS last_created_at

            FROM conversations c

            JOIN conversation_members m
                ON m.conversation_id = c.id
            AND m.user_id = $1

            LEFT JOIN LATERAL (
                SELECT content, sender_id, created_at
                FROM messages msg
                WHERE msg.conversation_id = c.id
                ORDER BY created_at DESC
                LIMIT 1
            ) lm ON TRUE

            ORDER BY c.last_message_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn search_by_name(
        &self,
        user_id: &Uuid,
        pattern: &str,
    ) -> Result<Vec<ConversationRaw>, error::SystemError> {
        let rows = sqlx::query_as::<_, ConversationRaw>(
            r#"
            SELECT
                c.id,
                c.type,
                c.name,
                c.creator_id,
                c.last_message_at,
                c.created_at,

                lm.content    AS last_content,
                lm.sender_id  AS last_sender_id,
                lm.created_at AS last_created_at

            FROM conversations c

            JOIN conversation_members m
                ON m.conversation_id = c.id
            AND m.user_id = $1
            AND m.state = 'joined'

            LEFT JOIN LATERAL (
                SELECT content, sender_id, created_at
                FROM messages msg
                WHERE msg.conversation_id = c.id
                ORDER BY created_at DESC
                LIMIT 1
            ) lm ON TRUE

            WHERE c.name ILIKE $2
            ORDER BY c.last_message_at DESC
            "#,
        )
        .bind(user_id)
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

#[derive(Clone, Default)]
pub struct MemberPgRepository {}

#[async_trait::async_trait]
impl MemberRepository for MemberPgRepository {
    async fn find_member<'e, E>(
        &self,
        conversation_id: &Uuid,
        user_id: &Uuid,
        tx: E,
    ) -> Result<Option<ConversationMemberEntity>, error::SystemError>
    where
        E: sqlx::Executor<'e, Database = sqlx::Postgres>,
    {
        let member = sqlx::query_as::<_, ConversationMemberEntity>(
            "SELECT * FROM conversation_members WHERE conversation_id = $1 AND user_id = $2",
        )
        .bind(conversation_id)
        .bind(user_id)
        .fetch_optional(tx)
        .await?;

        Ok(member)
    }

    async fn add_joined<'e, E>(
        &self,
        conversation_id: &Uuid,
        user_id: &Uuid,
        tx: E,
    ) -> Result<ConversationMemberEntity, error::SystemError>
    where
        E: sqlx::Executor<'e, Database = sqlx::Postgres>,
    {
        let member = sqlx::query_as::<_, ConversationMemberEntity>(
            r#"
            INSERT INTO conversation_members (conversation_id, user_id, state, joined_at)
            VALUES ($1, $2, 'joined', NOW())
            RETURNING *
            "#,
        )
        .bind(conversation_id)
        .bind(user_id)
        .fetch_one(tx)
        .await?;

        Ok(member)
    }

    async fn set_joined<'e, E>(
        &self,
        conversation_id: &Uuid,
        user_id: &Uuid,
        tx: E,
    ) -> Result<bool, error::SystemError>
    where
        E: sqlx::Executor<'e, Database = sqlx::Postgres>,
    {
        let rows = sqlx::query(
            r#"
            UPDATE conversation_members
            SET state = 'joined', joined_at = NOW()
            WHERE conversation_id = $1
            AND user_id = $2
            AND state = 'invited'
            "#,
        )
        .bind(conversation_id)
        .bind(user_id)
        .execute(tx)
        .await?
        .rows_affected();

        Ok(rows > 0)
    }

    async fn remove<'e, E>(
        &self,
        conversation_id: &Uuid,
        user_id: &Uuid,
        tx: E,
    ) -> Result<bool, error::SystemError>
    where
        E: sqlx::Executor<'e, Database = sqlx::Postgres>,
    {
        let rows = sqlx::query(
            "DELETE FROM conversation_members WHERE conversation_id = $1 AND user_id = $2",
        )
        .bind(conversation_id)
        .bind(user_id)
        .execute(tx)
        .await?
        .rows_affected();

        Ok(rows > 0)
    }

    async fn remove_invited<'e, E>(
        &self,
        conversation_id: &Uuid,
        user_id: &Uuid,
        tx: E,
    ) -> Result<bool, error::SystemError>
    where
        E: sqlx::Executor<'e, Database = sqlx::Postgres>,
    {
        let rows = sqlx::query(
            r#"
            DELETE FROM conversation_members
            WHERE conversation_id = $1
            AND user_id = $2
            AND state = 'invited'
            "#,
        )
        .bind(conversation_id)
        .bind(user_id)
        .execute(tx)
        .await?
        .rows_affected();

        Ok(rows > 0)
    }

    async fn find_members_for_conversations<'e, E>(
        &self,
        conversation_ids: &[Uuid],
        tx: E,
    ) -> Result<Vec<MemberDetailRow>, error::SystemError>
    where
        E: sqlx::Executor<'e, Database = sqlx::Postgres>,
    {
        let members = sqlx::query_as::<_, MemberDetailRow>(
            r#"
            SELECT
                m.conversation_id,
                m.user_id,
                u.display_name,
                u.avatar_url,
                u.is_online,
                m.state,
                m.joined_at
            FROM conversation_members m
            JOIN users u ON u.id = m.user_id
            WHERE m.conversation_id = ANY($1)
            "#,
        )
        .bind(conversation_ids)
        .fetch_all(tx)
        .await?;

        Ok(members)
    }

    async fn find_joined_ids<'e, E>(
        &self,
        conversation_id: &Uuid,
        tx: E,
    ) -> Result<Vec<Uuid>, error::SystemError>
    where
        E: sqlx::Executor<'e, Database = sqlx::Postgres>,
    {
        let rows: Vec<(Uuid,)> = sqlx::query_as(
            r#"
            SELECT user_id
            FROM conversation_members
            WHERE conversation_id = $1
            AND state = 'joined'
            "#,
        )
        .bind(conversation_id)
        .fetch_all(tx)
        .await?;

        Ok(rows.into_iter().map(|r| r.0).collect())
    }
}

use uuid::Uuid;

use crate::{
    api::error,
    modules::typing::{repository::TypingRepository, schema::TypingUserRow},
};

#[derive(Clone)]
pub struct TypingRepositoryPg {
    pool: sqlx::PgPool,
}

impl TypingRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl TypingRepository for TypingRepositoryPg {
    async fn upsert(
        &self,
        conversation_id: &Uuid,
        user_id: &Uuid,
    ) -> Result<(), error::SystemError> {
        sqlx::query(
            r#"
            INSERT INTO typing_indicators (conversation_id, user_id, last_typed_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (conversation_id, user_id) DO UPDATE
            SET last_typed_at = NOW()
            "#,
        )
        .bind(conversation_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_conversation(
        &self,
        conversation_id: &Uuid,
    ) -> Result<Vec<TypingUserRow>, error::SystemError> {
        // the inner join drops indicators whose user no longer resolves
        let rows = sqlx::query_as::<_, TypingUserRow>(
            r#"
            SELECT
                t.user_id,
                u.display_name,
                u.avatar_url,
                t.last_typed_at
            FROM typing_indicators t
            JOIN users u ON u.id = t.user_id
            WHERE t.conversation_id = $1
            "#,
        )
        .bind(conversation_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn clear(
        &self,
        conversation_id: &Uuid,
        user_id: &Uuid,
    ) -> Result<bool, error::SystemError> {
        let rows = sqlx::query(
            "DELETE FROM typing_indicators WHERE conversation_id = $1 AND user_id = $2",
        )
        .bind(conversation_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(rows > 0)
    }
}

use uuid::Uuid;

use crate::{
    api::error,
    modules::user::{model::SyncUserModel, repository::UserRepository, schema::UserEntity},
};

#[derive(Clone)]
pub struct UserRepositoryPg {
    pool: sqlx::PgPool,
}

impl UserRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl UserRepository for UserRepositoryPg {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<UserEntity>, error::SystemError> {
        let user = sqlx::query_as::<_, UserEntity>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<UserEntity>, error::SystemError> {
        let user = sqlx::query_as::<_, UserEntity>("SELECT * FROM users WHERE external_id = $1")
            .bind(external_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn upsert(&self, user: &SyncUserModel) -> Result<UserEntity, error::SystemError> {
        let id = Uuid::now_v7();
        let entity = sqlx::query_as::<_, UserEntity>(
            r#"
            INSERT INTO users (id, external_id, email, display_name, avatar_url, is_online, last_seen)
            VALUES ($1, $2, $3, $4, $5, TRUE, NOW())
            ON CONFLICT (external_id) DO UPDATE
            SET email        = EXCLUDED.email,
                display_name = EXCLUDED.display_name,
                avatar_url   = EXCLUDED.avatar_url,
                is_online    = TRUE,
                last_seen    = NOW(),
                updated_at   = NOW()
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&user.external_id)
        .bind(&user.email)
        .bind(&user.display_name)
        .bind(&user.avatar_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(entity)
    }

    async fn set_online(
        &self,
        id: &Uuid,
        is_online: bool,
    ) -> Result<UserEntity, error::SystemError> {
        let user = sqlx::query_as::<_, UserEntity>(
            r#"
            UPDATE users
            SET is_online = $2,
                last_seen = NOW(),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(is_online)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| error::SystemError::not_found("User not found"))?;

        Ok(user)
    }

    async fn toggle_friend_requests_enabled(
        &self,
        id: &Uuid,
    ) -> Result<bool, error::SystemError> {
        let row: (bool,) = sqlx::query_as(
            r#"
            UPDATE users
            SET friend_requests_enabled = NOT friend_requests_enabled,
                updated_at = NOW()
            WHERE id = $1
            RETURNING friend_requests_enabled
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| error::SystemError::not_found("User not found"))?;

        Ok(row.0)
    }

    async fn find_all(&self) -> Result<Vec<UserEntity>, error::SystemError> {
        let users = sqlx::query_as::<_, UserEntity>("SELECT * FROM users ORDER BY display_name")
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    async fn find_online(&self) -> Result<Vec<UserEntity>, error::SystemError> {
        let users = sqlx::query_as::<_, UserEntity>(
            "SELECT * FROM users WHERE is_online ORDER BY display_name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    async fn search_users(
        &self,
        query: &str,
        limit: i32,
    ) -> Result<Vec<UserEntity>, error::SystemError> {
        let search_pattern = format!("%{}%", query.replace('%', "\\%").replace('_', "\\_"));
        let users = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT * FROM users
            WHERE lower(display_name) LIKE lower($1)
               OR lower(email) LIKE lower($1)
            ORDER BY display_name
            LIMIT $2
            "#,
        )
        .bind(&search_pattern)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }
}

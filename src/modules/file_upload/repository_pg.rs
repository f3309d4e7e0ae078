use uuid::Uuid;

use crate::{
    api::error,
    modules::file_upload::{
        model::NewStoredFile, repository::StoredFileRepository, schema::StoredFileEntity,
    },
};

#[derive(Clone)]
pub struct StoredFilePgRepository {
    pool: sqlx::PgPool,
}

impl StoredFilePgRepository {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl StoredFileRepository for StoredFilePgRepository {
    fn get_pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }

    async fn create<'e, E>(
        &self,
        file: &NewStoredFile,
        tx: E,
    ) -> Result<StoredFileEntity, error::SystemError>
    where
        E: sqlx::Executor<'e, Database = sqlx::Postgres>,
    {
        let id = Uuid::now_v7();
        let entity = sqlx::query_as::<_, StoredFileEntity>(
            r#"
            INSERT INTO files (id, filename, original_filename, mime_type, file_size, storage_path, uploaded_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&file.filename)
        .bind(&file.original_filename)
        .bind(&file.mime_type)
        .bind(file.file_size)
        .bind(&file.storage_path)
        .bind(file.uploaded_by)
        .fetch_one(tx)
        .await?;

        Ok(entity)
    }

    async fn find_by_id(
        &self,
        file_id: &Uuid,
    ) -> Result<Option<StoredFileEntity>, error::SystemError> {
        let file = sqlx::query_as::<_, StoredFileEntity>("SELECT * FROM files WHERE id = $1")
            .bind(file_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(file)
    }

    async fn delete<'e, E>(&self, file_id: &Uuid, tx: E) -> Result<(), error::SystemError>
    where
        E: sqlx::Executor<'e, Database = sqlx::Postgres>,
    {
        sqlx::query("DELETE FROM files WHERE id = $1")
            .bind(file_id)
            .execute(tx)
            .await?;

        Ok(())
    }
}

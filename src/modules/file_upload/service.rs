use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::error;
use crate::modules::file_upload::{
    model::{NewStoredFile, UploadConfig},
    repository::StoredFileRepository,
    schema::{StoredFileEntity, UploadResponse},
};

#[derive(Clone)]
pub struct UploadService<R>
where
    R: StoredFileRepository + Send + Sync,
{
    file_repo: Arc<R>,
    config: UploadConfig,
}

impl<R> UploadService<R>
where
    R: StoredFileRepository + Send + Sync,
{
    pub fn with_dependencies(file_repo: Arc<R>, config: UploadConfig) -> Self {
        Self { file_repo, config }
    }

    /// Edge validation: size cap and MIME allow-list. The core never
    /// inspects file bytes beyond this.
    fn validate_file(&self, file_size: usize, mime_type: &str) -> Result<(), error::SystemError> {
        if file_size > self.config.max_file_size {
            return Err(error::SystemError::bad_request(format!(
                "File size exceeds the {} byte limit",
                self.config.max_file_size
            )));
        }

        if !self.config.allowed_mime_types.iter().any(|allowed| allowed == mime_type) {
            return Err(error::SystemError::bad_request(format!(
                "File type '{}' is not allowed",
                mime_type
            )));
        }

        Ok(())
    }

    /// Opaque on-disk name: a fresh uuid keeping the original extension.
    fn generate_filename(&self, original_filename: &str) -> String {
        let extension =
            Path::new(original_filename).extension().and_then(|ext| ext.to_str()).unwrap_or("");
        let uuid = Uuid::now_v7();
        if extension.is_empty() {
            uuid.to_string()
        } else {
            format!("{}.{}", uuid, extension)
        }
    }

    fn file_url(&self, filename: &str) -> String {
        format!("{}/{}", self.config.base_url, filename)
    }

    pub async fn upload_file(
        &self,
        original_filename: String,
        bytes: Vec<u8>,
        mime_type: String,
        uploaded_by: Uuid,
    ) -> Result<UploadResponse, error::SystemError> {
        self.validate_file(bytes.len(), &mime_type)?;

        let filename = self.generate_filename(&original_filename);

        tokio::fs::create_dir_all(&self.config.upload_dir).await?;
        let storage_path = format!("{}/{}", self.config.upload_dir, filename);
        tokio::fs::write(&storage_path, &bytes).await?;

        let mut tx = self.file_repo.get_pool().begin().await?;

        let entity = self
            .file_repo
            .create(
                &NewStoredFile {
                    filename: filename.clone(),
                    original_filename,
                    mime_type,
                    file_size: bytes.len() as i64,
                    storage_path,
                    uploaded_by,
                },
                tx.as_mut(),
            )
            .await?;

        tx.commit().await?;

        let url = self.file_url(&entity.filename);
        Ok(UploadResponse {
            id: entity.id,
            filename: entity.filename,
            original_filename: entity.original_filename,
            mime_type: entity.mime_type,
            file_size: entity.file_size,
            url,
            created_at: entity.created_at,
        })
    }

    pub async fn get_file(
        &self,
        file_id: &Uuid,
    ) -> Result<Option<StoredFileEntity>, error::SystemError> {
        self.file_repo.find_by_id(file_id).await
    }

    /// Metadata plus the retrievable URL for an opaque storage id.
    pub async fn get_file_url(&self, file_id: &Uuid) -> Result<UploadResponse, error::SystemError> {
        let entity = self
            .file_repo
            .find_by_id(file_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("File not found"))?;

        let url = self.file_url(&entity.filename);
        Ok(UploadResponse {
            id: entity.id,
            filename: entity.filename,
            original_filename: entity.original_filename,
            mime_type: entity.mime_type,
            file_size: entity.file_size,
            url,
            created_at: entity.created_at,
        })
    }

    pub async fn delete_file(&self, file_id: &Uuid) -> Result<(), error::SystemError> {
        let file = self
            .file_repo
            .find_by_id(file_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("File not found"))?;

        tokio::fs::remove_file(&file.storage_path).await.ok();

        let mut tx = self.file_repo.get_pool().begin().await?;
        self.file_repo.delete(file_id, tx.as_mut()).await?;
        tx.commit().await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::file_upload::repository_pg::StoredFilePgRepository;

    fn config() -> UploadConfig {
        UploadConfig {
            max_file_size: 10 * 1024 * 1024,
            allowed_mime_types: vec![
                "image/png".to_string(),
                "application/pdf".to_string(),
            ],
            upload_dir: "./uploads".to_string(),
            base_url: "/uploads".to_string(),
        }
    }

    fn service(config: UploadConfig) -> UploadService<StoredFilePgRepository> {
        let pool = sqlx::PgPool::connect_lazy("postgres://localhost/unused").unwrap();
        UploadService::with_dependencies(Arc::new(StoredFilePgRepository::new(pool)), config)
    }

    #[tokio::test]
    async fn test_allowed_type_within_limit_passes() {
        let svc = service(config());
        assert!(svc.validate_file(1024, "image/png").is_ok());
    }

    #[tokio::test]
    async fn test_oversized_file_rejected() {
        let svc = service(config());
        assert!(svc.validate_file(10 * 1024 * 1024 + 1, "image/png").is_err());
    }

    #[tokio::test]
    async fn test_exact_limit_passes() {
        let svc = service(config());
        assert!(svc.validate_file(10 * 1024 * 1024, "application/pdf").is_ok());
    }

    #[tokio::test]
    async fn test_disallowed_type_rejected() {
        let svc = service(config());
        assert!(svc.validate_file(1024, "application/x-sh").is_err());
    }

    #[tokio::test]
    async fn test_generated_filename_keeps_extension() {
        let svc = service(config());
        let name = svc.generate_filename("report.pdf");
        assert!(name.ends_with(".pdf"));
        assert_ne!(name, "report.pdf");
    }

    #[tokio::test]
    async fn test_generated_filename_without_extension() {
        let svc = service(config());
        let name = svc.generate_filename("README");
        assert!(!name.contains('.'));
    }
}

pub mod handle;
pub mod model;
pub mod repository;
pub mod repository_pg;
pub mod route;
pub mod schema;
pub mod service;

pub use model::{NewStoredFile, UploadConfig};
pub use repository::StoredFileRepository;
pub use repository_pg::StoredFilePgRepository;
pub use schema::{StoredFileEntity, UploadResponse};
pub use service::UploadService;

use actix_multipart::Multipart;
use actix_web::{web, HttpRequest};
use futures_util::TryStreamExt;
use uuid::Uuid;

use crate::api::{error, success};
use crate::middlewares::get_claims;
use crate::modules::file_upload::repository_pg::StoredFilePgRepository;
use crate::modules::file_upload::schema::UploadResponse;
use crate::modules::file_upload::service::UploadService;

pub type UploadSvc = UploadService<StoredFilePgRepository>;

pub async fn upload_file(
    mut payload: Multipart,
    req: HttpRequest,
    service: web::Data<UploadSvc>,
) -> Result<success::Success<UploadResponse>, error::Error> {
    let user_id = get_claims(&req)?.sub;

    if let Some(mut field) = payload.try_next().await.map_err(|_| error::Error::InternalServer)? {
        let content_disposition = field
            .content_disposition()
            .ok_or_else(|| error::Error::bad_request("Missing content disposition"))?;

        let filename = content_disposition
            .get_filename()
            .ok_or_else(|| error::Error::bad_request("Missing filename"))?
            .to_string();

        // content type from the part, guessed from the name as fallback
        let mime_type = field
            .content_type()
            .map(|m| m.to_string())
            .unwrap_or_else(|| mime_guess::from_path(&filename).first_or_octet_stream().to_string());

        let mut bytes = Vec::new();
        while let Some(chunk) = field.try_next().await.map_err(|_| error::Error::InternalServer)? {
            bytes.extend_from_slice(&chunk);
        }

        let result = service.upload_file(filename, bytes, mime_type, user_id).await?;

        return Ok(success::Success::created(Some(result)).message("File uploaded successfully"));
    }

    Err(error::Error::bad_request("No file found in request"))
}

pub async fn get_file(
    file_id: web::Path<Uuid>,
    service: web::Data<UploadSvc>,
) -> Result<success::Success<UploadResponse>, error::Error> {
    let response = service.get_file_url(&file_id.into_inner()).await?;
    Ok(success::Success::ok(Some(response)))
}

pub async fn delete_file(
    file_id: web::Path<Uuid>,
    req: HttpRequest,
    service: web::Data<UploadSvc>,
) -> Result<success::Success<()>, error::Error> {
    let file_id = file_id.into_inner();
    let user_id = get_claims(&req)?.sub;

    let file = service
        .get_file(&file_id)
        .await?
        .ok_or_else(|| error::Error::not_found("File not found"))?;

    if file.uploaded_by != user_id {
        return Err(error::Error::forbidden("You don't have permission to delete this file"));
    }

    service.delete_file(&file_id).await?;
    Ok(success::Success::no_content())
}

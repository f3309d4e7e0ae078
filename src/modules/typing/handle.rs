use actix_web::{delete, get, post, web, HttpRequest};
use uuid::Uuid;

use crate::{
    api::{error, success},
    middlewares::get_claims,
    modules::typing::{
        repository_pg::TypingRepositoryPg, schema::TypingUserRow, service::TypingService,
    },
};

pub type TypingSvc = TypingService<TypingRepositoryPg>;

#[post("/conversations/{conversation_id}/typing")]
pub async fn set_typing(
    typing_service: web::Data<TypingSvc>,
    conversation_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    typing_service.set_typing(*conversation_id, user_id).await?;

    Ok(success::Success::ok(None))
}

#[get("/conversations/{conversation_id}/typing")]
pub async fn get_typing_users(
    typing_service: web::Data<TypingSvc>,
    conversation_id: web::Path<Uuid>,
) -> Result<success::Success<Vec<TypingUserRow>>, error::Error> {
    let users = typing_service.get_typing_users(*conversation_id).await?;

    Ok(success::Success::ok(Some(users)))
}

#[delete("/conversations/{conversation_id}/typing")]
pub async fn clear_typing(
    typing_service: web::Data<TypingSvc>,
    conversation_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    typing_service.clear_typing(*conversation_id, user_id).await?;

    Ok(success::Success::no_content())
}

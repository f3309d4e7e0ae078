use actix_web::{delete, get, patch, post, web, HttpRequest};
use uuid::Uuid;

use crate::{
    api::{error, success},
    middlewares::get_claims,
    modules::{
        conversation::repository_pg::{ConversationPgRepository, MemberPgRepository},
        friend::repository_pg::FriendRequestRepositoryPg,
        message::{
            model::{
                EditMessageBody, MessagePage, MessageResponse, PageQuery, ReactionToggleResponse,
                SearchMessagesQuery, SendMessageBody, ToggleReactionBody,
            },
            repository_pg::{MessageRepositoryPg, ReactionRepositoryPg},
            schema::MessageEntity,
            service::MessageService,
        },
        notification::repository_pg::NotificationRepositoryPg,
    },
    utils::{ValidatedJson, ValidatedQuery},
};

pub type MessageSvc = MessageService<
    MessageRepositoryPg,
    ReactionRepositoryPg,
    ConversationPgRepository,
    MemberPgRepository,
    NotificationRepositoryPg,
    FriendRequestRepositoryPg,
>;

#[post("/")]
pub async fn send_message(
    message_service: web::Data<MessageSvc>,
    body: ValidatedJson<SendMessageBody>,
    req: HttpRequest,
) -> Result<success::Success<MessageEntity>, error::Error> {
    let sender_id = get_claims(&req)?.sub;
    let message = message_service.send_message(sender_id, body.0).await?;

    Ok(success::Success::created(Some(message)).message("Message sent successfully"))
}

#[patch("/{message_id}")]
pub async fn edit_message(
    message_service: web::Data<MessageSvc>,
    message_id: web::Path<Uuid>,
    body: ValidatedJson<EditMessageBody>,
    req: HttpRequest,
) -> Result<success::Success<MessageEntity>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let message = message_service.edit_message(*message_id, user_id, body.0.content).await?;

    Ok(success::Success::ok(Some(message)).message("Message edited successfully"))
}

#[delete("/{message_id}")]
pub async fn delete_message(
    message_service: web::Data<MessageSvc>,
    message_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    message_service.delete_message(*message_id, user_id).await?;

    Ok(success::Success::no_content())
}

#[post("/{message_id}/reactions")]
pub async fn toggle_reaction(
    message_service: web::Data<MessageSvc>,
    message_id: web::Path<Uuid>,
    body: ValidatedJson<ToggleReactionBody>,
    req: HttpRequest,
) -> Result<success::Success<ReactionToggleResponse>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let response = message_service.toggle_reaction(*message_id, user_id, body.0.emoji).await?;

    Ok(success::Success::ok(Some(response)))
}

#[get("/conversations/{conversation_id}/messages")]
pub async fn get_messages(
    message_service: web::Data<MessageSvc>,
    conversation_id: web::Path<Uuid>,
) -> Result<success::Success<Vec<MessageResponse>>, error::Error> {
    let messages = message_service.get_messages(*conversation_id).await?;

    Ok(success::Success::ok(Some(messages)).message("Messages retrieved successfully"))
}

#[get("/conversations/{conversation_id}/messages/page")]
pub async fn get_messages_paginated(
    message_service: web::Data<MessageSvc>,
    conversation_id: web::Path<Uuid>,
    query: ValidatedQuery<PageQuery>,
) -> Result<success::Success<MessagePage>, error::Error> {
    let page = message_service
        .get_messages_paginated(*conversation_id, query.0.limit, query.0.cursor)
        .await?;

    Ok(success::Success::ok(Some(page)).message("Messages retrieved successfully"))
}

#[get("/conversations/{conversation_id}/messages/search")]
pub async fn search_messages(
    message_service: web::Data<MessageSvc>,
    conversation_id: web::Path<Uuid>,
    query: ValidatedQuery<SearchMessagesQuery>,
) -> Result<success::Success<Vec<MessageResponse>>, error::Error> {
    let messages = message_service.search_messages(*conversation_id, &query.0.q).await?;

    Ok(success::Success::ok(Some(messages)).message("Messages retrieved successfully"))
}

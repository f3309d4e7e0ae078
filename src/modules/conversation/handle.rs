use actix_web::{delete, get, post, web, HttpRequest};
use uuid::Uuid;

use crate::{
    api::{error, success},
    middlewares::get_claims,
    modules::{
        conversation::{
            model::{
                AddParticipantBody, ConversationDetail, CreateGroupBody, DirectConversationBody,
                SearchConversationsQuery,
            },
            repository_pg::{ConversationPgRepository, MemberPgRepository},
            schema::ConversationEntity,
            service::ConversationService,
        },
        notification::repository_pg::NotificationRepositoryPg,
    },
    utils::{ValidatedJson, ValidatedQuery},
};

pub type ConversationSvc =
    ConversationService<ConversationPgRepository, MemberPgRepository, NotificationRepositoryPg>;

#[post("/")]
pub async fn create_group_conversation(
    conversation_service: web::Data<ConversationSvc>,
    body: ValidatedJson<CreateGroupBody>,
    req: HttpRequest,
) -> Result<success::Success<ConversationDetail>, error::Error> {
    let creator_id = get_claims(&req)?.sub;
    let detail = conversation_service
        .create_group(creator_id, body.0.name, body.0.member_ids)
        .await?;

    Ok(success::Success::created(Some(detail)).message("Group conversation created successfully"))
}

#[post("/direct")]
pub async fn get_or_create_direct_conversation(
    conversation_service: web::Data<ConversationSvc>,
    body: ValidatedJson<DirectConversationBody>,
    req: HttpRequest,
) -> Result<success::Success<ConversationEntity>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let conversation =
        conversation_service.get_or_create_direct(user_id, body.0.recipient_id).await?;

    Ok(success::Success::ok(Some(conversation)).message("Conversation ready"))
}

#[get("/")]
pub async fn list_conversations(
    conversation_service: web::Data<ConversationSvc>,
    req: HttpRequest,
) -> Result<success::Success<Vec<ConversationDetail>>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let conversations = conversation_service.get_by_user(user_id).await?;

    Ok(success::Success::ok(Some(conversations)).message("Conversations retrieved successfully"))
}

#[get("/search")]
pub async fn search_conversations(
    conversation_service: web::Data<ConversationSvc>,
    query: ValidatedQuery<SearchConversationsQuery>,
    req: HttpRequest,
) -> Result<success::Success<Vec<ConversationDetail>>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let conversations = conversation_service.search(user_id, &query.0.q).await?;

    Ok(success::Success::ok(Some(conversations)).message("Conversations retrieved successfully"))
}

#[get("/{conversation_id}")]
pub async fn get_conversation(
    conversation_service: web::Data<ConversationSvc>,
    conversation_id: web::Path<Uuid>,
) -> Result<success::Success<ConversationDetail>, error::Error> {
    let detail = conversation_service.get_detail(*conversation_id).await?;

    Ok(success::Success::ok(Some(detail)).message("Conversation retrieved successfully"))
}

#[post("/{conversation_id}/participants")]
pub async fn add_participant(
    conversation_service: web::Data<ConversationSvc>,
    conversation_id: web::Path<Uuid>,
    body: ValidatedJson<AddParticipantBody>,
) -> Result<success::Success<()>, error::Error> {
    conversation_service.add_participant(*conversation_id, body.0.user_id).await?;

    Ok(success::Success::ok(None).message("Participant added successfully"))
}

#[delete("/{conversation_id}/participants/{user_id}")]
pub async fn remove_participant(
    conversation_service: web::Data<ConversationSvc>,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<success::Success<()>, error::Error> {
    let (conversation_id, user_id) = path.into_inner();
    conversation_service.remove_participant(conversation_id, user_id).await?;

    Ok(success::Success::no_content())
}

#[post("/{conversation_id}/invitation/accept")]
pub async fn accept_invitation(
    conversation_service: web::Data<ConversationSvc>,
    conversation_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<ConversationDetail>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let detail = conversation_service.accept_invitation(*conversation_id, user_id).await?;

    Ok(success::Success::ok(Some(detail)).message("Invitation accepted"))
}

#[post("/{conversation_id}/invitation/decline")]
pub async fn decline_invitation(
    conversation_service: web::Data<ConversationSvc>,
    conversation_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    conversation_service.decline_invitation(*conversation_id, user_id).await?;

    Ok(success::Success::ok(None).message("Invitation declined"))
}

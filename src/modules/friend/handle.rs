use actix_web::{get, post, web, HttpRequest};
use uuid::Uuid;

use crate::{
    api::{error, success},
    middlewares::get_claims,
    modules::{
        friend::{
            model::{
                FriendRequestResponse, FriendRequestStatusResponse, FriendResponse,
                SendFriendRequestBody,
            },
            repository_pg::FriendRequestRepositoryPg,
            schema::FriendRequestEntity,
            service::FriendService,
        },
        notification::repository_pg::NotificationRepositoryPg,
    },
    utils::ValidatedJson,
};

pub type FriendSvc = FriendService<FriendRequestRepositoryPg, NotificationRepositoryPg>;

#[post("/requests")]
pub async fn send_friend_request(
    friend_service: web::Data<FriendSvc>,
    body: ValidatedJson<SendFriendRequestBody>,
    req: HttpRequest,
) -> Result<success::Success<FriendRequestEntity>, error::Error> {
    let sender_id = get_claims(&req)?.sub;
    let request = friend_service.send_friend_request(sender_id, body.0.recipient_id).await?;

    Ok(success::Success::created(Some(request)).message("Friend request sent successfully"))
}

#[post("/requests/{request_id}/accept")]
pub async fn accept_friend_request(
    friend_service: web::Data<FriendSvc>,
    request_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<FriendRequestEntity>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let request = friend_service.accept_friend_request(user_id, *request_id).await?;

    Ok(success::Success::ok(Some(request)).message("Friend request accepted successfully"))
}

#[post("/requests/{request_id}/decline")]
pub async fn decline_friend_request(
    friend_service: web::Data<FriendSvc>,
    request_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<FriendRequestEntity>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let request = friend_service.decline_friend_request(user_id, *request_id).await?;

    Ok(success::Success::ok(Some(request)).message("Friend request declined"))
}

#[get("/")]
pub async fn list_friends(
    friend_service: web::Data<FriendSvc>,
    req: HttpRequest,
) -> Result<success::Success<Vec<FriendResponse>>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let friends = friend_service.get_friends(user_id).await?;

    Ok(success::Success::ok(Some(friends)).message("Friends retrieved successfully"))
}

#[get("/requests")]
pub async fn list_pending_requests(
    friend_service: web::Data<FriendSvc>,
    req: HttpRequest,
) -> Result<success::Success<Vec<FriendRequestResponse>>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let requests = friend_service.get_pending_requests(user_id).await?;

    Ok(success::Success::ok(Some(requests)).message("Friend requests retrieved successfully"))
}

#[get("/requests/sent")]
pub async fn list_sent_requests(
    friend_service: web::Data<FriendSvc>,
    req: HttpRequest,
) -> Result<success::Success<Vec<FriendRequestResponse>>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let requests = friend_service.get_sent_requests(user_id).await?;

    Ok(success::Success::ok(Some(requests)).message("Sent friend requests retrieved successfully"))
}

#[get("/are-friends/{target_user_id}")]
pub async fn are_friends(
    friend_service: web::Data<FriendSvc>,
    target_user_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<bool>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let friends = friend_service.are_friends(user_id, *target_user_id).await?;

    Ok(success::Success::ok(Some(friends)))
}

#[get("/requests/status/{target_user_id}")]
pub async fn get_request_status(
    friend_service: web::Data<FriendSvc>,
    target_user_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<FriendRequestStatusResponse>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let status = friend_service.get_request_status(user_id, *target_user_id).await?;

    Ok(success::Success::ok(Some(status)))
}

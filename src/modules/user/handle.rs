use actix_web::{get, post, web, HttpRequest};
use uuid::Uuid;

use crate::middlewares::get_claims;
use crate::modules::user::{model, service::UserService};
use crate::{
    api::{error, success},
    utils::{ValidatedJson, ValidatedQuery},
};

#[post("/sync")]
pub async fn sync_user(
    user_service: web::Data<UserService>,
    profile: ValidatedJson<model::SyncUserModel>,
) -> Result<success::Success<model::SyncUserResponse>, error::Error> {
    let response = user_service.sync_user(profile.0).await?;
    Ok(success::Success::ok(Some(response)).message("User synced successfully"))
}

#[get("/profile")]
pub async fn get_profile(
    user_service: web::Data<UserService>,
    req: HttpRequest,
) -> Result<success::Success<model::UserResponse>, error::Error> {
    let id = get_claims(&req)?.sub;
    let user = user_service.get_by_id(id).await?;
    Ok(success::Success::ok(Some(user)).message("Profile retrieved successfully"))
}

#[get("/online")]
pub async fn list_online_users(
    user_service: web::Data<UserService>,
) -> Result<success::Success<Vec<model::UserResponse>>, error::Error> {
    let users = user_service.get_online().await?;
    Ok(success::Success::ok(Some(users)).message("Online users retrieved successfully"))
}

#[get("/search")]
pub async fn search_users(
    user_service: web::Data<UserService>,
    query: ValidatedQuery<model::SearchUsersQuery>,
) -> Result<success::Success<Vec<model::UserResponse>>, error::Error> {
    let users = user_service.search(&query.0.q, query.0.limit.unwrap_or(20)).await?;
    Ok(success::Success::ok(Some(users)).message("Users retrieved successfully"))
}

#[get("/external/{external_id}")]
pub async fn get_user_by_external_id(
    user_service: web::Data<UserService>,
    external_id: web::Path<String>,
) -> Result<success::Success<model::UserResponse>, error::Error> {
    let user = user_service.get_by_external_id(&external_id).await?;
    Ok(success::Success::ok(Some(user)).message("User retrieved successfully"))
}

#[get("/{id:[0-9a-fA-F-]{36}}")]
pub async fn get_user(
    user_service: web::Data<UserService>,
    user_id: web::Path<Uuid>,
) -> Result<success::Success<model::UserResponse>, error::Error> {
    let user = user_service.get_by_id(user_id.into_inner()).await?;
    Ok(success::Success::ok(Some(user)).message("User retrieved successfully"))
}

#[get("/")]
pub async fn list_users(
    user_service: web::Data<UserService>,
) -> Result<success::Success<Vec<model::UserResponse>>, error::Error> {
    let users = user_service.get_all().await?;
    Ok(success::Success::ok(Some(users)).message("Users retrieved successfully"))
}

#[post("/presence")]
pub async fn set_online(
    user_service: web::Data<UserService>,
    body: ValidatedJson<model::SetOnlineModel>,
    req: HttpRequest,
) -> Result<success::Success<model::UserResponse>, error::Error> {
    let id = get_claims(&req)?.sub;
    let user = user_service.set_online(id, body.0.is_online).await?;
    Ok(success::Success::ok(Some(user)).message("Presence updated successfully"))
}

#[post("/privacy/friend-requests")]
pub async fn toggle_friend_requests_enabled(
    user_service: web::Data<UserService>,
    req: HttpRequest,
) -> Result<success::Success<model::FriendRequestsEnabledResponse>, error::Error> {
    let id = get_claims(&req)?.sub;
    let enabled = user_service.toggle_friend_requests_enabled(id).await?;
    Ok(success::Success::ok(Some(model::FriendRequestsEnabledResponse {
        friend_requests_enabled: enabled,
    }))
    .message("Friend request setting updated successfully"))
}

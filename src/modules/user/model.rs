use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::modules::user::schema::UserEntity;

/// Profile payload the identity provider hands over on sign-in.
#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SyncUserModel {
    #[validate(length(min = 1, message = "External ID cannot be empty"))]
    pub external_id: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Display name cannot be empty"))]
    pub display_name: String,
    pub avatar_url: Option<String>,
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SetOnlineModel {
    pub is_online: bool,
}

#[derive(Deserialize, Validate)]
pub struct SearchUsersQuery {
    #[validate(length(min = 1, message = "Search query cannot be empty"))]
    pub q: String,
    #[validate(range(min = 1, max = 50, message = "Limit must be between 1 and 50"))]
    pub limit: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: uuid::Uuid,
    pub email: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub is_online: bool,
    pub last_seen: chrono::DateTime<chrono::Utc>,
    pub friend_requests_enabled: bool,
}

impl From<UserEntity> for UserResponse {
    fn from(entity: UserEntity) -> Self {
        UserResponse {
            id: entity.id,
            email: entity.email,
            display_name: entity.display_name,
            avatar_url: entity.avatar_url,
            is_online: entity.is_online,
            last_seen: entity.last_seen,
            friend_requests_enabled: entity.friend_requests_enabled,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncUserResponse {
    pub user: UserResponse,
    pub access_token: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequestsEnabledResponse {
    pub friend_requests_enabled: bool,
}

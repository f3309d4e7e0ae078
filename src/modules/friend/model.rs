use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::modules::friend::schema::FriendRequestStatus;
use crate::modules::user::schema::UserEntity;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendFriendRequestBody {
    pub recipient_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FriendResponse {
    pub id: Uuid,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub is_online: bool,
    pub last_seen: chrono::DateTime<chrono::Utc>,
}

impl From<UserEntity> for FriendResponse {
    fn from(user: UserEntity) -> Self {
        FriendResponse {
            id: user.id,
            display_name: user.display_name,
            avatar_url: user.avatar_url,
            is_online: user.is_online,
            last_seen: user.last_seen,
        }
    }
}

#[derive(FromRow)]
pub struct FriendRequestUserRow {
    pub req_id: Uuid,
    pub user_id: Uuid,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub is_online: bool,
    pub last_seen: chrono::DateTime<chrono::Utc>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// A pending request joined with the counterpart's profile, for the
/// incoming/outgoing request lists.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequestResponse {
    pub id: Uuid,
    pub counterpart: FriendResponse,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<FriendRequestUserRow> for FriendRequestResponse {
    fn from(row: FriendRequestUserRow) -> Self {
        FriendRequestResponse {
            id: row.req_id,
            counterpart: FriendResponse {
                id: row.user_id,
                display_name: row.display_name,
                avatar_url: row.avatar_url,
                is_online: row.is_online,
                last_seen: row.last_seen,
            },
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum RequestDirection {
    Sent,
    Received,
}

/// Pair status: `{ status: null, direction: null, request_id: null }` when
/// no request exists between the two users.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequestStatusResponse {
    pub status: Option<FriendRequestStatus>,
    pub direction: Option<RequestDirection>,
    pub request_id: Option<Uuid>,
}

impl FriendRequestStatusResponse {
    pub fn none() -> Self {
        Self { status: None, direction: None, request_id: None }
    }
}

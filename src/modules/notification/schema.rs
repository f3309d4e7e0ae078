use serde::{Deserialize, Serialize};
use sqlx::prelude::{FromRow, Type};
use uuid::Uuid;

#[derive(Debug, PartialEq, Clone, Type, Serialize, Deserialize)]
#[sqlx(type_name = "notification_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    Message,
    FriendRequest,
    FriendRequestAccepted,
    GroupInvite,
}

/// A notification row. Carries exactly one of `conversation_id` /
/// `friend_request_id` as context, depending on the type.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub _type: NotificationType,
    pub sender_id: Uuid,
    pub conversation_id: Option<Uuid>,
    pub friend_request_id: Option<Uuid>,
    pub is_read: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

use serde::Serialize;
use sqlx::prelude::FromRow;
use uuid::Uuid;

use crate::modules::conversation::schema::ConversationType;
use crate::modules::friend::schema::FriendRequestStatus;
use crate::modules::notification::schema::NotificationType;

/// Notification to insert. Built only through the typed constructors so
/// every call site states which context id it carries.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub user_id: Uuid,
    pub _type: NotificationType,
    pub sender_id: Uuid,
    pub conversation_id: Option<Uuid>,
    pub friend_request_id: Option<Uuid>,
}

impl NewNotification {
    pub fn message(recipient_id: Uuid, sender_id: Uuid, conversation_id: Uuid) -> Self {
        Self {
            user_id: recipient_id,
            _type: NotificationType::Message,
            sender_id,
            conversation_id: Some(conversation_id),
            friend_request_id: None,
        }
    }

    pub fn friend_request(recipient_id: Uuid, sender_id: Uuid, request_id: Uuid) -> Self {
        Self {
            user_id: recipient_id,
            _type: NotificationType::FriendRequest,
            sender_id,
            conversation_id: None,
            friend_request_id: Some(request_id),
        }
    }

    pub fn friend_request_accepted(recipient_id: Uuid, sender_id: Uuid, request_id: Uuid) -> Self {
        Self {
            user_id: recipient_id,
            _type: NotificationType::FriendRequestAccepted,
            sender_id,
            conversation_id: None,
            friend_request_id: Some(request_id),
        }
    }

    pub fn group_invite(recipient_id: Uuid, sender_id: Uuid, conversation_id: Uuid) -> Self {
        Self {
            user_id: recipient_id,
            _type: NotificationType::GroupInvite,
            sender_id,
            conversation_id: Some(conversation_id),
            friend_request_id: None,
        }
    }
}

/// Flat enrichment row: notification + sender profile + optional
/// conversation, other-participant and friend-request context.
#[derive(FromRow)]
pub struct NotificationRow {
    pub id: Uuid,
    #[sqlx(rename = "type")]
    pub _type: NotificationType,
    pub sender_id: Uuid,
    pub conversation_id: Option<Uuid>,
    pub friend_request_id: Option<Uuid>,
    pub is_read: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,

    pub sender_display_name: String,
    pub sender_avatar_url: Option<String>,

    pub conversation_type: Option<ConversationType>,
    pub conversation_name: Option<String>,

    pub other_user_id: Option<Uuid>,
    pub other_user_display_name: Option<String>,
    pub other_user_avatar_url: Option<String>,

    pub friend_request_status: Option<FriendRequestStatus>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSender {
    pub id: Uuid,
    pub display_name: String,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationConversation {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub _type: ConversationType,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationFriendRequest {
    pub id: Uuid,
    pub status: FriendRequestStatus,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub _type: NotificationType,
    pub is_read: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub sender: NotificationSender,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation: Option<NotificationConversation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_user: Option<NotificationSender>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub friend_request: Option<NotificationFriendRequest>,
}

impl From<NotificationRow> for NotificationResponse {
    fn from(row: NotificationRow) -> Self {
        let conversation = match (row.conversation_id, row.conversation_type) {
            (Some(id), Some(_type)) => {
                Some(NotificationConversation { id, _type, name: row.conversation_name })
            }
            _ => None,
        };

        let other_user = match (row.other_user_id, row.other_user_display_name) {
            (Some(id), Some(display_name)) => Some(NotificationSender {
                id,
                display_name,
                avatar_url: row.other_user_avatar_url,
            }),
            _ => None,
        };

        let friend_request = match (row.friend_request_id, row.friend_request_status) {
            (Some(id), Some(status)) => Some(NotificationFriendRequest { id, status }),
            _ => None,
        };

        NotificationResponse {
            id: row.id,
            _type: row._type,
            is_read: row.is_read,
            created_at: row.created_at,
            sender: NotificationSender {
                id: row.sender_id,
                display_name: row.sender_display_name,
                avatar_url: row.sender_avatar_url,
            },
            conversation,
            other_user,
            friend_request,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnreadCountResponse {
    pub count: i64,
}

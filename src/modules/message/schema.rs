use serde::{Deserialize, Serialize};
use sqlx::prelude::{FromRow, Type};
use uuid::Uuid;

#[derive(Debug, PartialEq, Clone, Type, Serialize, Deserialize)]
#[sqlx(type_name = "message_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Text,
    Image,
    File,
    Voice,
}

/// For non-text types `content` holds the stored file's URL or name.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageEntity {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub sender_id: Uuid,
    pub content: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub _type: MessageType,
    pub reply_to_id: Option<Uuid>,
    pub is_edited: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// One row per (message, user, emoji); the composite primary key is the
/// no-duplicate-reaction invariant.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageReactionEntity {
    #[serde(skip_serializing)]
    pub message_id: Uuid,
    pub user_id: Uuid,
    pub emoji: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

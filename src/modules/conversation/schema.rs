use serde::{Deserialize, Serialize};
use sqlx::prelude::{FromRow, Type};
use uuid::Uuid;

#[derive(Debug, PartialEq, Clone, Type, Serialize, Deserialize)]
#[sqlx(type_name = "conversation_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ConversationType {
    Direct,
    Group,
}

#[derive(Debug, PartialEq, Clone, Type, Serialize, Deserialize)]
#[sqlx(type_name = "member_state", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MemberState {
    Invited,
    Joined,
}

#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationEntity {
    pub id: Uuid,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub _type: ConversationType,
    pub name: Option<String>,
    pub creator_id: Option<Uuid>,
    /// Sorted member-pair key; set for direct conversations only. The
    /// unique index on it is what makes get-or-create race-safe.
    #[serde(skip_serializing)]
    pub direct_key: Option<String>,
    pub last_message_at: chrono::DateTime<chrono::Utc>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// One row per (conversation, user). `state` is `invited` until the user
/// accepts a group invitation; direct conversations only ever hold joined
/// rows.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationMemberEntity {
    pub conversation_id: Uuid,
    pub user_id: Uuid,
    pub state: MemberState,
    pub invited_by: Option<Uuid>,
    pub joined_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

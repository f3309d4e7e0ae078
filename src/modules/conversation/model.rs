use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::modules::conversation::schema::{ConversationType, MemberState};

/// Canonical key for a direct conversation: the two user ids, sorted, so
/// the same unordered pair always maps to the same key.
pub fn direct_key(user_a: &Uuid, user_b: &Uuid) -> String {
    let (lo, hi) = if user_a <= user_b { (user_a, user_b) } else { (user_b, user_a) };
    format!("{lo}:{hi}")
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroupBody {
    #[validate(length(min = 1, max = 100, message = "Group name must be 1-100 characters"))]
    pub name: String,
    #[validate(length(min = 1, message = "At least one member is required"))]
    pub member_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DirectConversationBody {
    pub recipient_id: Uuid,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddParticipantBody {
    pub user_id: Uuid,
}

#[derive(Deserialize, Validate)]
pub struct SearchConversationsQuery {
    #[validate(length(min = 1, message = "Search query cannot be empty"))]
    pub q: String,
}

/// Member joined with the user's profile, scoped to a conversation.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberDetailRow {
    #[serde(skip_serializing)]
    pub conversation_id: Uuid,
    pub user_id: Uuid,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub is_online: bool,
    pub state: MemberState,
    pub joined_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LastMessageRow {
    pub content: String,
    pub sender_id: Uuid,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Flat listing row straight from the query; split into
/// `ConversationDetail` in the service.
#[derive(FromRow)]
pub struct ConversationRaw {
    pub id: Uuid,
    #[sqlx(rename = "type")]
    pub _type: ConversationType,
    pub name: Option<String>,
    pub creator_id: Option<Uuid>,
    pub last_message_at: chrono::DateTime<chrono::Utc>,
    pub created_at: chrono::DateTime<chrono::Utc>,

    pub last_content: Option<String>,
    pub last_sender_id: Option<Uuid>,
    pub last_created_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationDetail {
    pub conversation_id: Uuid,
    #[serde(rename = "type")]
    pub _type: ConversationType,
    pub name: Option<String>,
    pub creator_id: Option<Uuid>,
    pub last_message_at: chrono::DateTime<chrono::Utc>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub members: Vec<MemberDetailRow>,
    pub last_message: Option<LastMessageRow>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_key_is_order_independent() {
        let a = Uuid::now_v7();
        let b = Uuid::now_v7();

        assert_eq!(direct_key(&a, &b), direct_key(&b, &a));
    }

    #[test]
    fn test_direct_key_distinct_pairs_differ() {
        let a = Uuid::now_v7();
        let b = Uuid::now_v7();
        let c = Uuid::now_v7();

        assert_ne!(direct_key(&a, &b), direct_key(&a, &c));
        assert_ne!(direct_key(&a, &b), direct_key(&b, &c));
    }

    #[test]
    fn test_direct_key_orders_lexicographically() {
        let a = Uuid::parse_str("00000000-0000-7000-8000-000000000001").unwrap();
        let b = Uuid::parse_str("00000000-0000-7000-8000-000000000002").unwrap();

        let key = direct_key(&b, &a);
        assert!(key.starts_with(&a.to_string()));
        assert!(key.ends_with(&b.to_string()));
    }
}

use serde::Serialize;
use sqlx::prelude::FromRow;
use uuid::Uuid;

/// Ephemeral per-(conversation, user) typing signal. Rows are never swept;
/// reads filter on freshness instead.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingIndicatorEntity {
    pub conversation_id: Uuid,
    pub user_id: Uuid,
    pub last_typed_at: chrono::DateTime<chrono::Utc>,
}

/// Typing row joined with the typist's profile.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingUserRow {
    pub user_id: Uuid,
    pub display_name: String,
    pub avatar_url: Option<String>,
    #[serde(skip_serializing)]
    pub last_typed_at: chrono::DateTime<chrono::Utc>,
}

use uuid::Uuid;

use crate::api::error;
use crate::modules::typing::schema::TypingUserRow;

#[async_trait::async_trait]
pub trait TypingRepository {
    /// Upsert: stamp `last_typed_at = now`, inserting the row on first use.
    async fn upsert(
        &self,
        conversation_id: &Uuid,
        user_id: &Uuid,
    ) -> Result<(), error::SystemError>;

    /// All rows for the conversation joined with user profiles, stale ones
    /// included; freshness is the caller's concern.
    async fn find_by_conversation(
        &self,
        conversation_id: &Uuid,
    ) -> Result<Vec<TypingUserRow>, error::SystemError>;

    /// Idempotent delete.
    async fn clear(
        &self,
        conversation_id: &Uuid,
        user_id: &Uuid,
    ) -> Result<bool, error::SystemError>;
}

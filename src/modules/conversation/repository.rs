use uuid::Uuid;

use crate::{
    api::error,
    modules::conversation::{
        model::{ConversationRaw, MemberDetailRow},
        schema::{ConversationEntity, ConversationMemberEntity},
    },
};

#[async_trait::async_trait]
pub trait ConversationRepository {
    fn get_pool(&self) -> &sqlx::Pool<sqlx::Postgres>;

    async fn find_by_id<'e, E>(
        &self,
        conversation_id: &Uuid,
        tx: E,
    ) -> Result<Option<ConversationEntity>, error::SystemError>
    where
        E: sqlx::Executor<'e, Database = sqlx::Postgres>;

    /// Point lookup on the canonical sorted-pair key.
    async fn find_by_direct_key(
        &self,
        key: &str,
    ) -> Result<Option<ConversationEntity>, error::SystemError>;

    /// Insert a direct conversation plus its two joined members.
    async fn create_direct(
        &self,
        user_a: &Uuid,
        user_b: &Uuid,
        direct_key: &str,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> Result<ConversationEntity, error::SystemError>;

    /// Insert a group conversation: the creator joins immediately, every
    /// other id lands on the invite list.
    async fn create_group(
        &self,
        name: &str,
        creator_id: &Uuid,
        invited_ids: &[Uuid],
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> Result<ConversationEntity, error::SystemError>;

    async fn touch_last_message_at<'e, E>(
        &self,
        conversation_id: &Uuid,
        tx: E,
    ) -> Result<(), error::SystemError>
    where
        E: sqlx::Executor<'e, Database = sqlx::Postgres>;

    /// Every conversation where the user is joined or invited, newest
    /// activity first, with the latest message attached.
    async fn find_all_by_user(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<ConversationRaw>, error::SystemError>;

    /// Case-insensitive name match over the user's conversations.
    async fn search_by_name(
        &self,
        user_id: &Uuid,
        pattern: &str,
    ) -> Result<Vec<ConversationRaw>, error::SystemError>;
}

#[async_trait::async_trait]
pub trait MemberRepository {
    async fn find_member<'e, E>(
        &self,
        conversation_id: &Uuid,
        user_id: &Uuid,
        tx: E,
    ) -> Result<Option<ConversationMemberEntity>, error::SystemError>
    where
        E: sqlx::Executor<'e, Database = sqlx::Postgres>;

    async fn add_joined<'e, E>(
        &self,
        conversation_id: &Uuid,
        user_id: &Uuid,
        tx: E,
    ) -> Result<ConversationMemberEntity, error::SystemError>
    where
        E: sqlx::Executor<'e, Database = sqlx::Postgres>;

    /// Flip an invited row to joined. Returns false when no invited row
    /// exists ("not invited").
    async fn set_joined<'e, E>(
        &self,
        conversation_id: &Uuid,
        user_id: &Uuid,
        tx: E,
    ) -> Result<bool, error::SystemError>
    where
        E: sqlx::Executor<'e, Database = sqlx::Postgres>;

    async fn remove<'e, E>(
        &self,
        conversation_id: &Uuid,
        user_id: &Uuid,
        tx: E,
    ) -> Result<bool, error::SystemError>
    where
        E: sqlx::Executor<'e, Database = sqlx::Postgres>;

    /// Delete an invited row only; joined members are untouched.
    async fn remove_invited<'e, E>(
        &self,
        conversation_id: &Uuid,
        user_id: &Uuid,
        tx: E,
    ) -> Result<bool, error::SystemError>
    where
        E: sqlx::Executor<'e, Database = sqlx::Postgres>;

    async fn find_members_for_conversations<'e, E>(
        &self,
        conversation_ids: &[Uuid],
        tx: E,
    ) -> Result<Vec<MemberDetailRow>, error::SystemError>
    where
        E: sqlx::Executor<'e, Database = sqlx::Postgres>;

    /// Joined member ids, for notification fan-out.
    async fn find_joined_ids<'e, E>(
        &self,
        conversation_id: &Uuid,
        tx: E,
    ) -> Result<Vec<Uuid>, error::SystemError>
    where
        E: sqlx::Executor<'e, Database = sqlx::Postgres>;
}

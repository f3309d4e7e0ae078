use uuid::Uuid;

use crate::{api::error, modules::user::model::SyncUserModel, modules::user::schema::UserEntity};

#[async_trait::async_trait]
pub trait UserRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<UserEntity>, error::SystemError>;

    async fn find_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<UserEntity>, error::SystemError>;

    /// Insert on first sign-in, patch profile + online state on every later
    /// one. Keyed on the immutable external id.
    async fn upsert(&self, user: &SyncUserModel) -> Result<UserEntity, error::SystemError>;

    async fn set_online(
        &self,
        id: &Uuid,
        is_online: bool,
    ) -> Result<UserEntity, error::SystemError>;

    async fn toggle_friend_requests_enabled(&self, id: &Uuid)
    -> Result<bool, error::SystemError>;

    async fn find_all(&self) -> Result<Vec<UserEntity>, error::SystemError>;

    async fn find_online(&self) -> Result<Vec<UserEntity>, error::SystemError>;

    /// Search users by display name or email (case-insensitive, partial match)
    async fn search_users(
        &self,
        query: &str,
        limit: i32,
    ) -> Result<Vec<UserEntity>, error::SystemError>;
}

use log::info;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::error;
use crate::configs::RedisCache;
use crate::utils::Claims;
use crate::ENV;

use crate::modules::user::model::{SyncUserModel, SyncUserResponse, UserResponse};
use crate::modules::user::repository::UserRepository;

const USER_CACHE_TTL: usize = 3600;

#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository + Send + Sync>,
    cache: Arc<RedisCache>,
}

impl UserService {
    pub fn with_dependencies(
        repo: Arc<dyn UserRepository + Send + Sync>,
        cache: Arc<RedisCache>,
    ) -> Self {
        info!("UserService initialized with dependencies");
        UserService { repo, cache }
    }

    /// Identity sync: upsert the provider profile and mint an access token.
    /// Called on every sign-in; the external id is the upsert key.
    pub async fn sync_user(
        &self,
        profile: SyncUserModel,
    ) -> Result<SyncUserResponse, error::SystemError> {
        let entity = self.repo.upsert(&profile).await?;

        let access_token = Claims::new(&entity.id, ENV.access_token_expiration)
            .encode(ENV.jwt_secret.as_ref())?;

        self.invalidate(&entity.id).await?;

        info!("User {} synced from external id {}", entity.id, profile.external_id);

        Ok(SyncUserResponse { user: UserResponse::from(entity), access_token })
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<UserResponse, error::SystemError> {
        let key = format!("user:{}", id);
        if let Some(cached_user) = self.cache.get::<UserResponse>(&key).await? {
            return Ok(cached_user);
        }
        let user_entity = self.repo.find_by_id(&id).await?;
        if let Some(entity) = user_entity {
            let response = UserResponse::from(entity);
            self.cache.set(&key, &response, USER_CACHE_TTL).await?;
            Ok(response)
        } else {
            Err(error::SystemError::not_found("User not found"))
        }
    }

    pub async fn get_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<UserResponse, error::SystemError> {
        let entity = self
            .repo
            .find_by_external_id(external_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("User not found"))?;
        Ok(UserResponse::from(entity))
    }

    pub async fn set_online(
        &self,
        id: Uuid,
        is_online: bool,
    ) -> Result<UserResponse, error::SystemError> {
        let entity = self.repo.set_online(&id, is_online).await?;
        self.invalidate(&id).await?;
        Ok(UserResponse::from(entity))
    }

    pub async fn toggle_friend_requests_enabled(
        &self,
        id: Uuid,
    ) -> Result<bool, error::SystemError> {
        let enabled = self.repo.toggle_friend_requests_enabled(&id).await?;
        self.invalidate(&id).await?;
        Ok(enabled)
    }

    pub async fn get_all(&self) -> Result<Vec<UserResponse>, error::SystemError> {
        let users = self.repo.find_all().await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    pub async fn get_online(&self) -> Result<Vec<UserResponse>, error::SystemError> {
        let users = self.repo.find_online().await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    pub async fn search(
        &self,
        query: &str,
        limit: i32,
    ) -> Result<Vec<UserResponse>, error::SystemError> {
        let users = self.repo.search_users(query, limit).await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    async fn invalidate(&self, id: &Uuid) -> Result<(), error::SystemError> {
        let key = format!("user:{}", id);
        self.cache.delete(&key).await
    }
}

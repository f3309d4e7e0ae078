use std::sync::Arc;
use uuid::Uuid;

use crate::api::error;
use crate::modules::notification::{model::NotificationResponse, repository::NotificationRepository};

const DEFAULT_LIMIT: i64 = 20;

#[derive(Clone)]
pub struct NotificationService<R>
where
    R: NotificationRepository + Send + Sync,
{
    notification_repo: Arc<R>,
}

impl<R> NotificationService<R>
where
    R: NotificationRepository + Send + Sync,
{
    pub fn with_dependencies(notification_repo: Arc<R>) -> Self {
        NotificationService { notification_repo }
    }

    pub async fn get_unread(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<NotificationResponse>, error::SystemError> {
        let rows = self.notification_repo.find_unread(&user_id).await?;
        Ok(rows.into_iter().map(NotificationResponse::from).collect())
    }

    pub async fn get_recent(
        &self,
        user_id: Uuid,
        limit: Option<i64>,
    ) -> Result<Vec<NotificationResponse>, error::SystemError> {
        let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, 100);
        let rows = self.notification_repo.find_recent(&user_id, limit).await?;
        Ok(rows.into_iter().map(NotificationResponse::from).collect())
    }

    pub async fn mark_read(&self, notification_id: Uuid) -> Result<(), error::SystemError> {
        let updated = self.notification_repo.mark_read(&notification_id).await?;
        if !updated {
            return Err(error::SystemError::not_found("Notification not found"));
        }
        Ok(())
    }

    pub async fn mark_all_read(&self, user_id: Uuid) -> Result<u64, error::SystemError> {
        self.notification_repo.mark_all_read(&user_id).await
    }

    pub async fn delete(&self, notification_id: Uuid) -> Result<(), error::SystemError> {
        let deleted = self.notification_repo.delete(&notification_id).await?;
        if !deleted {
            return Err(error::SystemError::not_found("Notification not found"));
        }
        Ok(())
    }

    pub async fn unread_count(&self, user_id: Uuid) -> Result<i64, error::SystemError> {
        self.notification_repo.unread_count(&user_id).await
    }
}

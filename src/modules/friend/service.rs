use actix::Addr;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        friend::{
            model::{
                FriendRequestResponse, FriendRequestStatusResponse, FriendResponse,
                RequestDirection,
            },
            repository::FriendRequestRepository,
            schema::{FriendRequestEntity, FriendRequestStatus},
        },
        notification::{model::NewNotification, repository::NotificationRepository},
        realtime::{events::SendToUser, message::ServerMessage, server::RealtimeServer},
        user::repository::UserRepository,
    },
};

#[derive(Clone)]
pub struct FriendService<R, N>
where
    R: FriendRequestRepository + Send + Sync,
    N: NotificationRepository + Send + Sync,
{
    friend_repo: Arc<R>,
    notification_repo: Arc<N>,
    user_repo: Arc<dyn UserRepository + Send + Sync>,
    realtime: Arc<Addr<RealtimeServer>>,
}

impl<R, N> FriendService<R, N>
where
    R: FriendRequestRepository + Send + Sync,
    N: NotificationRepository + Send + Sync,
{
    pub fn with_dependencies(
        friend_repo: Arc<R>,
        notification_repo: Arc<N>,
        user_repo: Arc<dyn UserRepository + Send + Sync>,
        realtime: Arc<Addr<RealtimeServer>>,
    ) -> Self {
        FriendService { friend_repo, notification_repo, user_repo, realtime }
    }

    /// Gating predicate used by the message store's friend-only check.
    pub async fn are_friends(
        &self,
        user_a: Uuid,
        user_b: Uuid,
    ) -> Result<bool, error::SystemError> {
        let accepted = self.friend_repo.find_accepted_between(&user_a, &user_b).await?;
        Ok(accepted.is_some())
    }

    pub async fn get_friends(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<FriendResponse>, error::SystemError> {
        self.friend_repo.find_friends(&user_id).await
    }

    pub async fn send_friend_request(
        &self,
        sender_id: Uuid,
        recipient_id: Uuid,
    ) -> Result<FriendRequestEntity, error::SystemError> {
        if recipient_id == sender_id {
            return Err(error::SystemError::bad_request(
                "Cannot send a friend request to yourself",
            ));
        }

        if self.user_repo.find_by_id(&recipient_id).await?.is_none() {
            return Err(error::SystemError::not_found("Recipient user not found"));
        }

        let mut tx = self.friend_repo.get_pool().begin().await?;

        let forward = self.friend_repo.find_pair(&sender_id, &recipient_id, tx.as_mut()).await?;
        let reverse = self.friend_repo.find_pair(&recipient_id, &sender_id, tx.as_mut()).await?;

        for existing in [&forward, &reverse] {
            match existing.as_ref().map(|r| &r.status) {
                Some(FriendRequestStatus::Accepted) => {
                    return Err(error::SystemError::conflict("Users are already friends"));
                }
                Some(FriendRequestStatus::Pending) => {
                    return Err(error::SystemError::conflict(
                        "A friend request between these users is already pending",
                    ));
                }
                // a declined row is superseded below
                Some(FriendRequestStatus::Declined) | None => {}
            }
        }

        self.friend_repo.delete_declined_between(&sender_id, &recipient_id, tx.as_mut()).await?;

        let request = self.friend_repo.create(&sender_id, &recipient_id, tx.as_mut()).await?;

        let notification = self
            .notification_repo
            .create(
                &NewNotification::friend_request(recipient_id, sender_id, request.id),
                tx.as_mut(),
            )
            .await?;

        tx.commit().await?;

        self.push_notification(recipient_id, &notification);

        Ok(request)
    }

    pub async fn accept_friend_request(
        &self,
        user_id: Uuid,
        request_id: Uuid,
    ) -> Result<FriendRequestEntity, error::SystemError> {
        let mut tx = self.friend_repo.get_pool().begin().await?;

        let request = self
            .friend_repo
            .find_by_id_for_update(&request_id, &mut tx)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Friend request not found"))?;

        if request.recipient_id != user_id {
            return Err(error::SystemError::forbidden(
                "You are not allowed to accept this friend request",
            ));
        }

        if request.status != FriendRequestStatus::Pending {
            return Err(error::SystemError::conflict("Request is not pending"));
        }

        let request = self
            .friend_repo
            .set_status(&request_id, FriendRequestStatus::Accepted, tx.as_mut())
            .await?;

        self.notification_repo
            .mark_read_for_friend_request(&request_id, &user_id, tx.as_mut())
            .await?;

        // tell the original sender their request was accepted
        let notification = self
            .notification_repo
            .create(
                &NewNotification::friend_request_accepted(
                    request.sender_id,
                    request.recipient_id,
                    request_id,
                ),
                tx.as_mut(),
            )
            .await?;

        tx.commit().await?;

        self.push_notification(request.sender_id, &notification);

        Ok(request)
    }

    pub async fn decline_friend_request(
        &self,
        user_id: Uuid,
        request_id: Uuid,
    ) -> Result<FriendRequestEntity, error::SystemError> {
        let mut tx = self.friend_repo.get_pool().begin().await?;

        let request = self
            .friend_repo
            .find_by_id_for_update(&request_id, &mut tx)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Friend request not found"))?;

        if request.recipient_id != user_id {
            return Err(error::SystemError::forbidden(
                "You are not allowed to decline this friend request",
            ));
        }

        if request.status != FriendRequestStatus::Pending {
            return Err(error::SystemError::conflict("Request is not pending"));
        }

        let request = self
            .friend_repo
            .set_status(&request_id, FriendRequestStatus::Declined, tx.as_mut())
            .await?;

        self.notification_repo
            .mark_read_for_friend_request(&request_id, &user_id, tx.as_mut())
            .await?;

        tx.commit().await?;

        Ok(request)
    }

    pub async fn get_pending_requests(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<FriendRequestResponse>, error::SystemError> {
        let rows = self.friend_repo.find_pending_to_user(&user_id).await?;
        Ok(rows.into_iter().map(FriendRequestResponse::from).collect())
    }

    pub async fn get_sent_requests(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<FriendRequestResponse>, error::SystemError> {
        let rows = self.friend_repo.find_pending_from_user(&user_id).await?;
        Ok(rows.into_iter().map(FriendRequestResponse::from).collect())
    }

    pub async fn get_request_status(
        &self,
        user_id: Uuid,
        target_user_id: Uuid,
    ) -> Result<FriendRequestStatusResponse, error::SystemError> {
        let pool = self.friend_repo.get_pool();

        if let Some(sent) = self.friend_repo.find_pair(&user_id, &target_user_id, pool).await? {
            return Ok(FriendRequestStatusResponse {
                status: Some(sent.status),
                direction: Some(RequestDirection::Sent),
                request_id: Some(sent.id),
            });
        }

        if let Some(received) = self.friend_repo.find_pair(&target_user_id, &user_id, pool).await? {
            return Ok(FriendRequestStatusResponse {
                status: Some(received.status),
                direction: Some(RequestDirection::Received),
                request_id: Some(received.id),
            });
        }

        Ok(FriendRequestStatusResponse::none())
    }

    fn push_notification(
        &self,
        recipient_id: Uuid,
        notification: &crate::modules::notification::schema::NotificationEntity,
    ) {
        let payload = serde_json::to_value(notification).unwrap_or_default();
        self.realtime.do_send(SendToUser {
            user_id: recipient_id,
            message: ServerMessage::Notification { notification: payload },
        });
    }
}

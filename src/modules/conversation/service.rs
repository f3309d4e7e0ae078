use actix::Addr;
use std::{collections::HashMap, sync::Arc};
use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        conversation::{
            model::{direct_key, ConversationDetail, ConversationRaw, LastMessageRow},
            repository::{ConversationRepository, MemberRepository},
            schema::{ConversationEntity, ConversationType, MemberState},
        },
        notification::{model::NewNotification, repository::NotificationRepository},
        realtime::{events::SendToUser, message::ServerMessage, server::RealtimeServer},
    },
};

#[derive(Clone)]
pub struct ConversationService<R, M, N>
where
    R: ConversationRepository + Send + Sync,
    M: MemberRepository + Send + Sync,
    N: NotificationRepository + Send + Sync,
{
    conversation_repo: Arc<R>,
    member_repo: Arc<M>,
    notification_repo: Arc<N>,
    realtime: Arc<Addr<RealtimeServer>>,
}

impl<R, M, N> ConversationService<R, M, N>
where
    R: ConversationRepository + Send + Sync,
    M: MemberRepository + Send + Sync,
    N: NotificationRepository + Send + Sync,
{
    pub fn with_dependencies(
        conversation_repo: Arc<R>,
        member_repo: Arc<M>,
        notification_repo: Arc<N>,
        realtime: Arc<Addr<RealtimeServer>>,
    ) -> Self {
        ConversationService { conversation_repo, member_repo, notification_repo, realtime }
    }

    pub async fn get_by_id(
        &self,
        conversation_id: Uuid,
    ) -> Result<ConversationEntity, error::SystemError> {
        let conversation = self
            .conversation_repo
            .find_by_id(&conversation_id, self.conversation_repo.get_pool())
            .await?
            .ok_or_else(|| error::SystemError::not_found("Conversation not found"))?;

        Ok(conversation)
    }

    /// Group creation: the creator joins immediately, everyone else is
    /// invited and gets a group_invite notification.
    pub async fn create_group(
        &self,
        creator_id: Uuid,
        name: String,
        member_ids: Vec<Uuid>,
    ) -> Result<ConversationDetail, error::SystemError> {
        let mut invited: Vec<Uuid> = member_ids;
        invited.sort();
        invited.dedup();
        invited.retain(|id| *id != creator_id);

        let mut tx = self.conversation_repo.get_pool().begin().await?;

        let conversation =
            self.conversation_repo.create_group(&name, &creator_id, &invited, &mut tx).await?;

        let mut notifications = Vec::with_capacity(invited.len());
        for user_id in &invited {
            let notification = self
                .notification_repo
                .create(
                    &NewNotification::group_invite(*user_id, creator_id, conversation.id),
                    tx.as_mut(),
                )
                .await?;
            notifications.push(notification);
        }

        tx.commit().await?;

        for notification in &notifications {
            let payload = serde_json::to_value(notification).unwrap_or_default();
            self.realtime.do_send(SendToUser {
                user_id: notification.user_id,
                message: ServerMessage::Notification { notification: payload },
            });
        }

        self.get_detail(conversation.id).await
    }

    /// Idempotent "start chat": the sorted-pair key maps the same unordered
    /// pair to the same conversation, in either argument order.
    pub async fn get_or_create_direct(
        &self,
        user_a: Uuid,
        user_b: Uuid,
    ) -> Result<ConversationEntity, error::SystemError> {
        if user_a == user_b {
            return Err(error::SystemError::bad_request(
                "Cannot start a conversation with yourself",
            ));
        }

        let key = direct_key(&user_a, &user_b);

        if let Some(existing) = self.conversation_repo.find_by_direct_key(&key).await? {
            return Ok(existing);
        }

        let mut tx = self.conversation_repo.get_pool().begin().await?;
        match self.conversation_repo.create_direct(&user_a, &user_b, &key, &mut tx).await {
            Ok(conversation) => {
                tx.commit().await?;
                Ok(conversation)
            }
            // lost the race on the unique key: someone else created it
            Err(error::SystemError::Conflict(_)) => {
                drop(tx);
                self.conversation_repo
                    .find_by_direct_key(&key)
                    .await?
                    .ok_or_else(|| error::SystemError::not_found("Conversation not found"))
            }
            Err(e) => Err(e),
        }
    }

    pub async fn get_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<ConversationDetail>, error::SystemError> {
        let conversations = self.conversation_repo.find_all_by_user(&user_id).await?;
        self.assemble_details(conversations).await
    }

    pub async fn search(
        &self,
        user_id: Uuid,
        term: &str,
    ) -> Result<Vec<ConversationDetail>, error::SystemError> {
        let pattern = format!("%{}%", term.replace('%', "\\%").replace('_', "\\_"));
        let conversations = self.conversation_repo.search_by_name(&user_id, &pattern).await?;
        self.assemble_details(conversations).await
    }

    pub async fn get_detail(
        &self,
        conversation_id: Uuid,
    ) -> Result<ConversationDetail, error::SystemError> {
        let conversation = self.get_by_id(conversation_id).await?;

        let members = self
            .member_repo
            .find_members_for_conversations(&[conversation_id], self.conversation_repo.get_pool())
            .await?;

        Ok(ConversationDetail {
            conversation_id: conversation.id,
            _type: conversation._type,
            name: conversation.name,
            creator_id: conversation.creator_id,
            last_message_at: conversation.last_message_at,
            created_at: conversation.created_at,
            members,
            last_message: None,
        })
    }

    pub async fn add_participant(
        &self,
        conversation_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), error::SystemError> {
        let mut tx = self.conversation_repo.get_pool().begin().await?;

        let conversation = self
            .conversation_repo
            .find_by_id(&conversation_id, tx.as_mut())
            .await?
            .ok_or_else(|| error::SystemError::not_found("Conversation not found"))?;

        if conversation._type != ConversationType::Group {
            return Err(error::SystemError::bad_request(
                "Participants can only be added to group conversations",
            ));
        }

        if let Some(member) =
            self.member_repo.find_member(&conversation_id, &user_id, tx.as_mut()).await?
        {
            let msg = match member.state {
                MemberState::Joined => "User is already in this group",
                MemberState::Invited => "User is already invited to this group",
            };
            return Err(error::SystemError::conflict(msg));
        }

        self.member_repo.add_joined(&conversation_id, &user_id, tx.as_mut()).await?;

        tx.commit().await?;

        Ok(())
    }

    pub async fn remove_participant(
        &self,
        conversation_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), error::SystemError> {
        let pool = self.conversation_repo.get_pool();

        self.conversation_repo
            .find_by_id(&conversation_id, pool)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Conversation not found"))?;

        let removed = self.member_repo.remove(&conversation_id, &user_id, pool).await?;
        if !removed {
            return Err(error::SystemError::not_found("User is not in this conversation"));
        }

        Ok(())
    }

    /// Invited -> joined, and the invite notification flips to read in the
    /// same transaction.
    pub async fn accept_invitation(
        &self,
        conversation_id: Uuid,
        user_id: Uuid,
    ) -> Result<ConversationDetail, error::SystemError> {
        let mut tx = self.conversation_repo.get_pool().begin().await?;

        self.conversation_repo
            .find_by_id(&conversation_id, tx.as_mut())
            .await?
            .ok_or_else(|| error::SystemError::not_found("Conversation not found"))?;

        let joined = self.member_repo.set_joined(&conversation_id, &user_id, tx.as_mut()).await?;
        if !joined {
            return Err(error::SystemError::conflict("User is not invited to this group"));
        }

        self.notification_repo
            .mark_read_for_group_invite(&conversation_id, &user_id, tx.as_mut())
            .await?;

        tx.commit().await?;

        self.get_detail(conversation_id).await
    }

    /// Declining removes the invite; the notification is marked read, same
    /// as on accept.
    pub async fn decline_invitation(
        &self,
        conversation_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), error::SystemError> {
        let mut tx = self.conversation_repo.get_pool().begin().await?;

        self.conversation_repo
            .find_by_id(&conversation_id, tx.as_mut())
            .await?
            .ok_or_else(|| error::SystemError::not_found("Conversation not found"))?;

        let removed =
            self.member_repo.remove_invited(&conversation_id, &user_id, tx.as_mut()).await?;
        if !removed {
            return Err(error::SystemError::conflict("User is not invited to this group"));
        }

        self.notification_repo
            .mark_read_for_group_invite(&conversation_id, &user_id, tx.as_mut())
            .await?;

        tx.commit().await?;

        Ok(())
    }

    async fn assemble_details(
        &self,
        conversations: Vec<ConversationRaw>,
    ) -> Result<Vec<ConversationDetail>, error::SystemError> {
        let conversation_ids: Vec<Uuid> = conversations.iter().map(|c| c.id).collect();

        let members = self
            .member_repo
            .find_members_for_conversations(&conversation_ids, self.conversation_repo.get_pool())
            .await?;

        let mut member_map = members.into_iter().fold(
            HashMap::<Uuid, Vec<_>>::new(),
            |mut acc, member| {
                acc.entry(member.conversation_id).or_default().push(member);
                acc
            },
        );

        let details = conversations
            .into_iter()
            .map(|conv| {
                let last_message = match (conv.last_content, conv.last_sender_id, conv.last_created_at)
                {
                    (Some(content), Some(sender_id), Some(created_at)) => {
                        Some(LastMessageRow { content, sender_id, created_at })
                    }
                    _ => None,
                };

                ConversationDetail {
                    conversation_id: conv.id,
                    _type: conv._type,
                    name: conv.name,
                    creator_id: conv.creator_id,
                    last_message_at: conv.last_message_at,
                    created_at: conv.created_at,
                    members: member_map.remove(&conv.id).unwrap_or_default(),
                    last_message,
                }
            })
            .collect();

        Ok(details)
    }
}

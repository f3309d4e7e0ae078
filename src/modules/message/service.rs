/// Message service.
///
/// Owns the send path: friend-gate and membership checks, the message
/// insert, the conversation's last-activity bump and the per-recipient
/// notification fan-out run in one transaction; the room broadcast and the
/// live notification pushes happen after commit.
use actix::Addr;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::error;
use crate::modules::conversation::repository::{ConversationRepository, MemberRepository};
use crate::modules::conversation::schema::MemberState;
use crate::modules::friend::repository::FriendRequestRepository;
use crate::modules::message::model::{
    page_cursor, InsertMessage, MessagePage, MessageResponse, ReactionToggleResponse,
    SendMessageBody,
};
use crate::modules::message::repository::{MessageRepository, ReactionRepository};
use crate::modules::message::schema::MessageEntity;
use crate::modules::notification::model::NewNotification;
use crate::modules::notification::repository::NotificationRepository;
use crate::modules::realtime::events::{BroadcastToRoom, SendToUser};
use crate::modules::realtime::message::ServerMessage;
use crate::modules::realtime::server::RealtimeServer;
use crate::modules::user::repository::UserRepository;

const DEFAULT_PAGE_LIMIT: i64 = 50;

#[derive(Clone)]
pub struct MessageService<M, X, C, P, N, F>
where
    M: MessageRepository + Send + Sync,
    X: ReactionRepository + Send + Sync,
    C: ConversationRepository + Send + Sync,
    P: MemberRepository + Send + Sync,
    N: NotificationRepository + Send + Sync,
    F: FriendRequestRepository + Send + Sync,
{
    message_repo: Arc<M>,
    reaction_repo: Arc<X>,
    conversation_repo: Arc<C>,
    member_repo: Arc<P>,
    notification_repo: Arc<N>,
    friend_repo: Arc<F>,
    user_repo: Arc<dyn UserRepository + Send + Sync>,
    realtime: Arc<Addr<RealtimeServer>>,
}

impl<M, X, C, P, N, F> MessageService<M, X, C, P, N, F>
where
    M: MessageRepository + Send + Sync,
    X: ReactionRepository + Send + Sync,
    C: ConversationRepository + Send + Sync,
    P: MemberRepository + Send + Sync,
    N: NotificationRepository + Send + Sync,
    F: FriendRequestRepository + Send + Sync,
{
    #[allow(clippy::too_many_arguments)]
    pub fn with_dependencies(
        message_repo: Arc<M>,
        reaction_repo: Arc<X>,
        conversation_repo: Arc<C>,
        member_repo: Arc<P>,
        notification_repo: Arc<N>,
        friend_repo: Arc<F>,
        user_repo: Arc<dyn UserRepository + Send + Sync>,
        realtime: Arc<Addr<RealtimeServer>>,
    ) -> Self {
        MessageService {
            message_repo,
            reaction_repo,
            conversation_repo,
            member_repo,
            notification_repo,
            friend_repo,
            user_repo,
            realtime,
        }
    }

    pub async fn send_message(
        &self,
        sender_id: Uuid,
        body: SendMessageBody,
    ) -> Result<MessageEntity, error::SystemError> {
        // friend gate first: a recipient who turned friend requests off only
        // accepts direct messages from accepted friends
        if let Some(recipient_id) = body.recipient_id {
            let recipient = self
                .user_repo
                .find_by_id(&recipient_id)
                .await?
                .ok_or_else(|| error::SystemError::not_found("Recipient not found"))?;

            if !recipient.friend_requests_enabled {
                let accepted =
                    self.friend_repo.find_accepted_between(&sender_id, &recipient_id).await?;
                if accepted.is_none() {
                    return Err(error::SystemError::forbidden(
                        "This user only accepts messages from friends",
                    ));
                }
            }
        }

        let mut tx = self.conversation_repo.get_pool().begin().await?;

        self.conversation_repo
            .find_by_id(&body.conversation_id, tx.as_mut())
            .await?
            .ok_or_else(|| error::SystemError::not_found("Conversation not found"))?;

        let member = self
            .member_repo
            .find_member(&body.conversation_id, &sender_id, tx.as_mut())
            .await?;
        if !matches!(member.map(|m| m.state), Some(MemberState::Joined)) {
            return Err(error::SystemError::forbidden(
                "You are not a participant of this conversation",
            ));
        }

        if let Some(reply_to_id) = body.reply_to_id {
            let replied = self
                .message_repo
                .find_by_id(&reply_to_id, tx.as_mut())
                .await?
                .ok_or_else(|| error::SystemError::bad_request("Replied-to message not found"))?;

            if replied.conversation_id != body.conversation_id {
                return Err(error::SystemError::bad_request(
                    "Replied-to message belongs to a different conversation",
                ));
            }
        }

        let message = self
            .message_repo
            .create(
                &InsertMessage {
                    conversation_id: body.conversation_id,
                    sender_id,
                    content: body.content,
                    _type: body._type,
                    reply_to_id: body.reply_to_id,
                },
                tx.as_mut(),
            )
            .await?;

        self.conversation_repo
            .touch_last_message_at(&body.conversation_id, tx.as_mut())
            .await?;

        // fan out one notification per joined member, sender excluded
        let member_ids =
            self.member_repo.find_joined_ids(&body.conversation_id, tx.as_mut()).await?;

        let mut notifications = Vec::with_capacity(member_ids.len());
        for member_id in member_ids.into_iter().filter(|id| *id != sender_id) {
            let notification = self
                .notification_repo
                .create(
                    &NewNotification::message(member_id, sender_id, body.conversation_id),
                    tx.as_mut(),
                )
                .await?;
            notifications.push(notification);
        }

        tx.commit().await?;

        let message_json = serde_json::to_value(&message).unwrap_or_default();
        self.realtime.do_send(BroadcastToRoom {
            conversation_id: message.conversation_id,
            message: ServerMessage::NewMessage {
                conversation_id: message.conversation_id,
                message: message_json,
            },
            skip_user_id: Some(sender_id),
        });

        for notification in &notifications {
            let payload = serde_json::to_value(notification).unwrap_or_default();
            self.realtime.do_send(SendToUser {
                user_id: notification.user_id,
                message: ServerMessage::Notification { notification: payload },
            });
        }

        tracing::info!(
            "Message {} sent to conversation {} ({} notifications)",
            message.id,
            message.conversation_id,
            notifications.len()
        );

        Ok(message)
    }

    /// Full ascending history for live display.
    pub async fn get_messages(
        &self,
        conversation_id: Uuid,
    ) -> Result<Vec<MessageResponse>, error::SystemError> {
        let messages = self.message_repo.find_by_conversation(&conversation_id).await?;
        self.attach_reactions(messages).await
    }

    /// Backward "load older" pagination; the cursor is the oldest already
    /// delivered timestamp.
    pub async fn get_messages_paginated(
        &self,
        conversation_id: Uuid,
        limit: Option<i64>,
        cursor: Option<String>,
    ) -> Result<MessagePage, error::SystemError> {
        let limit = limit.unwrap_or(DEFAULT_PAGE_LIMIT);

        let before = match cursor {
            Some(c) => Some(
                chrono::DateTime::parse_from_rfc3339(&c)
                    .map_err(|_| error::SystemError::bad_request("Invalid cursor format"))?
                    .with_timezone(&chrono::Utc),
            ),
            None => None,
        };

        let mut messages = self.message_repo.find_page(&conversation_id, before, limit).await?;

        let next_cursor = page_cursor(&messages, limit).map(|c| c.to_rfc3339());

        messages.reverse();
        let messages = self.attach_reactions(messages).await?;

        Ok(MessagePage { messages, next_cursor })
    }

    pub async fn edit_message(
        &self,
        message_id: Uuid,
        user_id: Uuid,
        new_content: String,
    ) -> Result<MessageEntity, error::SystemError> {
        let mut tx = self.message_repo.get_pool().begin().await?;

        let message = self
            .message_repo
            .find_by_id(&message_id, tx.as_mut())
            .await?
            .ok_or_else(|| error::SystemError::not_found("Message not found"))?;

        if message.sender_id != user_id {
            return Err(error::SystemError::forbidden("You can only edit your own messages"));
        }

        let edited = self
            .message_repo
            .update_content(&message_id, &new_content, tx.as_mut())
            .await?
            .ok_or_else(|| error::SystemError::not_found("Message not found"))?;

        tx.commit().await?;

        self.realtime.do_send(BroadcastToRoom {
            conversation_id: message.conversation_id,
            message: ServerMessage::MessageEdited {
                conversation_id: message.conversation_id,
                message_id,
                new_content,
            },
            skip_user_id: None,
        });

        Ok(edited)
    }

    pub async fn delete_message(
        &self,
        message_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), error::SystemError> {
        let mut tx = self.message_repo.get_pool().begin().await?;

        let message = self
            .message_repo
            .find_by_id(&message_id, tx.as_mut())
            .await?
            .ok_or_else(|| error::SystemError::not_found("Message not found"))?;

        if message.sender_id != user_id {
            return Err(error::SystemError::forbidden("You can only delete your own messages"));
        }

        let deleted = self.message_repo.delete(&message_id, tx.as_mut()).await?;
        if !deleted {
            return Err(error::SystemError::not_found("Message not found or already deleted"));
        }

        tx.commit().await?;

        self.realtime.do_send(BroadcastToRoom {
            conversation_id: message.conversation_id,
            message: ServerMessage::MessageDeleted {
                conversation_id: message.conversation_id,
                message_id,
            },
            skip_user_id: None,
        });

        Ok(())
    }

    pub async fn toggle_reaction(
        &self,
        message_id: Uuid,
        user_id: Uuid,
        emoji: String,
    ) -> Result<ReactionToggleResponse, error::SystemError> {
        let mut tx = self.message_repo.get_pool().begin().await?;

        let message = self
            .message_repo
            .find_by_id(&message_id, tx.as_mut())
            .await?
            .ok_or_else(|| error::SystemError::not_found("Message not found"))?;

        let added = self.reaction_repo.toggle(&message_id, &user_id, &emoji, &mut tx).await?;
        let reactions = self.reaction_repo.find_for_message(&message_id, tx.as_mut()).await?;

        tx.commit().await?;

        let reactions_json = serde_json::to_value(&reactions).unwrap_or_default();
        self.realtime.do_send(BroadcastToRoom {
            conversation_id: message.conversation_id,
            message: ServerMessage::ReactionToggled {
                conversation_id: message.conversation_id,
                message_id,
                reactions: reactions_json,
            },
            skip_user_id: None,
        });

        Ok(ReactionToggleResponse { added, reactions })
    }

    pub async fn search_messages(
        &self,
        conversation_id: Uuid,
        term: &str,
    ) -> Result<Vec<MessageResponse>, error::SystemError> {
        let pattern = format!("%{}%", term.replace('%', "\\%").replace('_', "\\_"));
        let messages = self.message_repo.search(&conversation_id, &pattern).await?;
        self.attach_reactions(messages).await
    }

    async fn attach_reactions(
        &self,
        messages: Vec<MessageEntity>,
    ) -> Result<Vec<MessageResponse>, error::SystemError> {
        if messages.is_empty() {
            return Ok(vec![]);
        }

        let ids: Vec<Uuid> = messages.iter().map(|m| m.id).collect();
        let reactions = self.reaction_repo.find_for_messages(&ids).await?;

        let mut by_message = reactions.into_iter().fold(
            HashMap::<Uuid, Vec<_>>::new(),
            |mut acc, reaction| {
                acc.entry(reaction.message_id).or_default().push(reaction);
                acc
            },
        );

        Ok(messages
            .into_iter()
            .map(|message| MessageResponse {
                reactions: by_message.remove(&message.id).unwrap_or_default(),
                message,
            })
            .collect())
    }
}

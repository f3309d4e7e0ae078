/// Realtime session actor.
///
/// One actor per WebSocket connection. Holds the auth state, forwards
/// subscribed events to the client through an mpsc channel bridged in
/// handler.rs, and drives the message/typing services for socket-initiated
/// mutations. Async DB work runs via `ctx.spawn()` + `into_actor()`.
use actix::prelude::*;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::modules::message::handle::MessageSvc;
use crate::modules::message::model::SendMessageBody;
use crate::modules::message::schema::MessageType;
use crate::modules::typing::handle::TypingSvc;
use crate::modules::user::service::UserService;
use crate::utils::Claims;
use crate::ENV;

use super::events::*;
use super::message::{ClientMessage, ServerMessage};
use super::server::RealtimeServer;

pub struct RealtimeSession {
    /// Unique session ID
    pub id: Uuid,

    /// User ID after authentication (None before auth)
    pub user_id: Option<Uuid>,

    /// Address of the realtime server actor
    pub server: Addr<RealtimeServer>,

    /// Outbound JSON channel (bridged to the WebSocket in handler.rs)
    pub tx: mpsc::UnboundedSender<String>,

    /// Services for socket-initiated mutations (None in test environment)
    pub message_service: Option<actix_web::web::Data<MessageSvc>>,
    pub typing_service: Option<actix_web::web::Data<TypingSvc>>,
    pub user_service: Option<actix_web::web::Data<UserService>>,
}

impl RealtimeSession {
    pub fn new(
        server: Addr<RealtimeServer>,
        tx: mpsc::UnboundedSender<String>,
        message_service: actix_web::web::Data<MessageSvc>,
        typing_service: actix_web::web::Data<TypingSvc>,
        user_service: actix_web::web::Data<UserService>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            user_id: None,
            server,
            tx,
            message_service: Some(message_service),
            typing_service: Some(typing_service),
            user_service: Some(user_service),
        }
    }

    fn send_to_client(&self, msg: &ServerMessage) {
        match serde_json::to_string(msg) {
            Ok(json) => {
                if let Err(e) = self.tx.send(json) {
                    tracing::error!("Failed to push to client (session {}): {}", self.id, e);
                }
            }
            Err(e) => {
                tracing::error!("Failed to serialize ServerMessage (session {}): {}", self.id, e);
            }
        }
    }

    fn send_error(&self, message: &str) {
        self.send_to_client(&ServerMessage::Error { message: message.to_string() });
    }

    fn require_auth(&self) -> Option<Uuid> {
        if self.user_id.is_none() {
            self.send_error("You must authenticate before performing this action");
            tracing::warn!("Session {} not authenticated, rejecting request", self.id);
        }
        self.user_id
    }

    fn handle_client_message(&mut self, msg: &ClientMessage, ctx: &mut Context<Self>) {
        match msg {
            ClientMessage::Auth { token } => {
                self.handle_auth(token, ctx);
            }

            ClientMessage::SendMessage { conversation_id, content } => {
                self.handle_send_message(*conversation_id, content.clone(), ctx);
            }

            ClientMessage::JoinConversation { conversation_id } => {
                self.handle_join_conversation(*conversation_id);
            }

            ClientMessage::LeaveConversation { conversation_id } => {
                self.handle_leave_conversation(*conversation_id);
            }

            ClientMessage::TypingStart { conversation_id } => {
                self.handle_typing(*conversation_id, true, ctx);
            }

            ClientMessage::TypingStop { conversation_id } => {
                self.handle_typing(*conversation_id, false, ctx);
            }

            ClientMessage::Ping => {
                self.send_to_client(&ServerMessage::Pong);
            }
        }
    }

    /// Verify the access token, bind the user to the session, flip the user
    /// online and deliver the initial presence snapshot.
    fn handle_auth(&mut self, token: &str, ctx: &mut Context<Self>) {
        if self.user_id.is_some() {
            self.send_error("Session is already authenticated");
            return;
        }

        let claims = match Claims::decode(token, ENV.jwt_secret.as_ref()) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::warn!("Token verification failed (session {}): {}", self.id, e);
                self.send_to_client(&ServerMessage::AuthFailed {
                    reason: "Token invalid or expired".to_string(),
                });
                return;
            }
        };

        let user_id = claims.sub;

        self.user_id = Some(user_id);
        self.server.do_send(Authenticate { session_id: self.id, user_id });
        self.send_to_client(&ServerMessage::AuthSuccess { user_id });

        tracing::info!("User {} authenticated on session {}", user_id, self.id);

        let Some(user_service) = self.user_service.clone() else {
            return;
        };
        let server = self.server.clone();
        let tx = self.tx.clone();

        ctx.spawn(
            async move {
                if let Err(e) = user_service.set_online(user_id, true).await {
                    tracing::error!("Failed to mark user {} online: {}", user_id, e);
                }

                server.do_send(BroadcastToAll {
                    message: ServerMessage::UserOnline { user_id },
                });

                // initial presence snapshot for the fresh session
                if let Ok(user_ids) = server.send(GetOnlineUsers).await {
                    let msg = ServerMessage::OnlineUsers { user_ids };
                    if let Ok(json) = serde_json::to_string(&msg) {
                        let _ = tx.send(json);
                    }
                }
            }
            .into_actor(self),
        );
    }

    /// Persist the message through the service (which runs the fan-out and
    /// the room broadcast), then confirm to this client directly.
    fn handle_send_message(&self, conversation_id: Uuid, content: String, ctx: &mut Context<Self>) {
        let Some(user_id) = self.require_auth() else {
            return;
        };

        let Some(service) = self.message_service.clone() else {
            self.send_error("Message service unavailable");
            return;
        };

        let tx = self.tx.clone();
        let session_id = self.id;

        ctx.spawn(
            async move {
                let body = SendMessageBody {
                    conversation_id,
                    content,
                    _type: MessageType::Text,
                    recipient_id: None,
                    reply_to_id: None,
                };

                match service.send_message(user_id, body).await {
                    Ok(msg_entity) => {
                        // the service broadcast skips the sender; confirm here
                        let message_value = serde_json::to_value(&msg_entity).unwrap_or_default();
                        let confirm = ServerMessage::NewMessage {
                            conversation_id,
                            message: message_value,
                        };
                        if let Ok(json) = serde_json::to_string(&confirm) {
                            let _ = tx.send(json);
                        }
                    }
                    Err(e) => {
                        tracing::error!(
                            "Failed to send message (session {}, conversation {}): {}",
                            session_id,
                            conversation_id,
                            e
                        );

                        let err_msg = ServerMessage::Error {
                            message: "Could not send the message. Please try again.".to_string(),
                        };
                        if let Ok(json) = serde_json::to_string(&err_msg) {
                            let _ = tx.send(json);
                        }
                    }
                }
            }
            .into_actor(self),
        );
    }

    fn handle_join_conversation(&self, conversation_id: Uuid) {
        let Some(user_id) = self.require_auth() else {
            return;
        };

        self.server.do_send(JoinRoom { user_id, conversation_id });
        tracing::debug!("User {} subscribed to conversation {}", user_id, conversation_id);
    }

    fn handle_leave_conversation(&self, conversation_id: Uuid) {
        let Some(user_id) = self.require_auth() else {
            return;
        };

        self.server.do_send(LeaveRoom { user_id, conversation_id });
        tracing::debug!("User {} unsubscribed from conversation {}", user_id, conversation_id);
    }

    /// Typing start/stop goes through the typing service, which stamps the
    /// indicator row and broadcasts to the room minus the typist.
    fn handle_typing(&self, conversation_id: Uuid, start: bool, ctx: &mut Context<Self>) {
        let Some(user_id) = self.require_auth() else {
            return;
        };

        let Some(service) = self.typing_service.clone() else {
            self.send_error("Typing service unavailable");
            return;
        };

        ctx.spawn(
            async move {
                let result = if start {
                    service.set_typing(conversation_id, user_id).await
                } else {
                    service.clear_typing(conversation_id, user_id).await
                };

                if let Err(e) = result {
                    tracing::error!(
                        "Typing update failed (conversation {}, user {}): {}",
                        conversation_id,
                        user_id,
                        e
                    );
                }
            }
            .into_actor(self),
        );
    }
}

impl Actor for RealtimeSession {
    type Context = Context<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        tracing::debug!("Realtime session started: {}", self.id);

        self.server.do_send(Connect { id: self.id, addr: ctx.address() });
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        tracing::debug!("Realtime session stopped: {}", self.id);

        self.server.do_send(Disconnect { id: self.id });

        // flip the user offline only when this was their last session;
        // the registry is checked after the Disconnect above is processed
        if let (Some(user_id), Some(user_service)) = (self.user_id, self.user_service.clone()) {
            let server = self.server.clone();
            actix_web::rt::spawn(async move {
                let still_connected =
                    server.send(IsUserConnected { user_id }).await.unwrap_or(false);
                if still_connected {
                    return;
                }

                match user_service.set_online(user_id, false).await {
                    Ok(user) => {
                        server.do_send(BroadcastToAll {
                            message: ServerMessage::UserOffline {
                                user_id,
                                last_seen: user.last_seen.to_rfc3339(),
                            },
                        });
                    }
                    Err(e) => {
                        tracing::error!("Failed to mark user {} offline: {}", user_id, e);
                    }
                }
            });
        }
    }
}

/// Implement Message so ClientMessage can be forwarded from handler.rs
impl Message for ClientMessage {
    type Result = ();
}

impl Handler<ClientMessage> for RealtimeSession {
    type Result = ();

    fn handle(&mut self, msg: ClientMessage, ctx: &mut Context<Self>) {
        self.handle_client_message(&msg, ctx);
    }
}

/// ServerMessage from the server actor: serialize and push to the client
impl Handler<ServerMessage> for RealtimeSession {
    type Result = ();

    fn handle(&mut self, msg: ServerMessage, _ctx: &mut Context<Self>) {
        self.send_to_client(&msg);
    }
}

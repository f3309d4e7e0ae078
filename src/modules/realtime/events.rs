/// Actor events exchanged between session actors and the realtime server.
use actix::prelude::*;
use uuid::Uuid;

use super::message::ServerMessage;
use super::session::RealtimeSession;

/// Event: a new WebSocket connection was established
#[derive(Message)]
#[rtype(result = "()")]
pub struct Connect {
    /// Unique session ID
    pub id: Uuid,
    /// Address of the session actor
    pub addr: Addr<RealtimeSession>,
}

/// Event: a WebSocket connection closed
#[derive(Message)]
#[rtype(result = "()")]
pub struct Disconnect {
    pub id: Uuid,
}

/// Event: a session authenticated as a user
#[derive(Message)]
#[rtype(result = "()")]
pub struct Authenticate {
    pub session_id: Uuid,
    pub user_id: Uuid,
}

/// Event: does the user still have any live session? Used after Disconnect
/// to decide whether to flip the user offline (multi-device safe).
#[derive(Message)]
#[rtype(result = "bool")]
pub struct IsUserConnected {
    pub user_id: Uuid,
}

/// Event: subscribe a user to a conversation room
#[derive(Message)]
#[rtype(result = "()")]
pub struct JoinRoom {
    pub user_id: Uuid,
    pub conversation_id: Uuid,
}

/// Event: unsubscribe a user from a conversation room
#[derive(Message)]
#[rtype(result = "()")]
pub struct LeaveRoom {
    pub user_id: Uuid,
    pub conversation_id: Uuid,
}

/// Event: push a message to every subscriber of a room
#[derive(Message, Clone)]
#[rtype(result = "()")]
pub struct BroadcastToRoom {
    pub conversation_id: Uuid,
    pub message: ServerMessage,
    /// Optional: skip this user (e.g. the sender)
    pub skip_user_id: Option<Uuid>,
}

/// Event: push a message to one user's sessions (all devices)
#[derive(Message)]
#[rtype(result = "()")]
pub struct SendToUser {
    pub user_id: Uuid,
    pub message: ServerMessage,
}

/// Event: push a message to several users (group-invite fan-out)
#[derive(Message)]
#[rtype(result = "()")]
pub struct SendToUsers {
    pub user_ids: Vec<Uuid>,
    pub message: ServerMessage,
}

/// Event: list user IDs with at least one live session
#[derive(Message)]
#[rtype(result = "Vec<Uuid>")]
pub struct GetOnlineUsers;

/// Event: push a message to every connected session
#[derive(Message, Clone)]
#[rtype(result = "()")]
pub struct BroadcastToAll {
    pub message: ServerMessage,
}

/// Realtime server actor.
///
/// Owns every live WebSocket session, the per-user session sets and the
/// conversation rooms. This registry is the substitute for a reactive
/// store's live queries: mutations broadcast here, and every client
/// subscribed to the affected room or user receives the change.
use actix::prelude::*;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use super::events::*;
use super::message::ServerMessage;
use super::session::RealtimeSession;

pub struct RealtimeServer {
    /// Map: session_id -> session actor address
    sessions: HashMap<Uuid, Addr<RealtimeSession>>,

    /// Map: user_id -> set of session_ids.
    /// One user can hold several sessions (phone, tablet, desktop).
    users: HashMap<Uuid, HashSet<Uuid>>,

    /// Map: conversation_id -> set of user_ids subscribed to the room
    rooms: HashMap<Uuid, HashSet<Uuid>>,
}

impl RealtimeServer {
    pub fn new() -> Self {
        Self { sessions: HashMap::new(), users: HashMap::new(), rooms: HashMap::new() }
    }

    fn send_to_session(&self, session_id: &Uuid, message: ServerMessage) {
        if let Some(session_addr) = self.sessions.get(session_id) {
            session_addr.do_send(message);
        }
    }

    fn send_to_user(&self, user_id: &Uuid, message: ServerMessage) {
        if let Some(session_ids) = self.users.get(user_id) {
            for session_id in session_ids {
                self.send_to_session(session_id, message.clone());
            }
        }
    }
}

impl Actor for RealtimeServer {
    type Context = Context<Self>;

    fn started(&mut self, _ctx: &mut Self::Context) {
        tracing::info!("Realtime server started");
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        tracing::info!("Realtime server stopped");
    }
}

impl Handler<Connect> for RealtimeServer {
    type Result = ();

    fn handle(&mut self, msg: Connect, _: &mut Context<Self>) {
        tracing::debug!("New realtime session connected: {}", msg.id);
        self.sessions.insert(msg.id, msg.addr);
    }
}

impl Handler<Disconnect> for RealtimeServer {
    type Result = ();

    fn handle(&mut self, msg: Disconnect, _: &mut Context<Self>) {
        tracing::debug!("Realtime session disconnected: {}", msg.id);

        self.sessions.remove(&msg.id);

        // Drop the session from its user; forget the user once no session
        // remains
        let mut user_to_remove: Option<Uuid> = None;
        for (&user_id, sessions) in self.users.iter_mut() {
            if sessions.remove(&msg.id) {
                if sessions.is_empty() {
                    user_to_remove = Some(user_id);
                }
                break;
            }
        }

        if let Some(user_id) = user_to_remove {
            self.users.remove(&user_id);

            for room_users in self.rooms.values_mut() {
                room_users.remove(&user_id);
            }
            self.rooms.retain(|_, users| !users.is_empty());

            tracing::info!("User {} fully disconnected and removed from all rooms", user_id);

            // NOTE: the offline flip (DB write + userOffline broadcast) is
            // driven by the session actor, which owns the user service and
            // double-checks via IsUserConnected
        }
    }
}

impl Handler<Authenticate> for RealtimeServer {
    type Result = ();

    fn handle(&mut self, msg: Authenticate, _: &mut Context<Self>) {
        let sessions = self.users.entry(msg.user_id).or_default();
        sessions.insert(msg.session_id);

        tracing::info!(
            "User {} authenticated on session {} ({} active session(s))",
            msg.user_id,
            msg.session_id,
            sessions.len()
        );
    }
}

impl Handler<IsUserConnected> for RealtimeServer {
    type Result = bool;

    fn handle(&mut self, msg: IsUserConnected, _: &mut Context<Self>) -> Self::Result {
        self.users.get(&msg.user_id).is_some_and(|s| !s.is_empty())
    }
}

impl Handler<JoinRoom> for RealtimeServer {
    type Result = ();

    fn handle(&mut self, msg: JoinRoom, _: &mut Context<Self>) {
        self.rooms.entry(msg.conversation_id).or_default().insert(msg.user_id);

        tracing::debug!(
            "User {} joined conversation room {} ({} users in room)",
            msg.user_id,
            msg.conversation_id,
            self.rooms.get(&msg.conversation_id).map_or(0, HashSet::len)
        );
    }
}

impl Handler<LeaveRoom> for RealtimeServer {
    type Result = ();

    fn handle(&mut self, msg: LeaveRoom, _: &mut Context<Self>) {
        if let Some(room) = self.rooms.get_mut(&msg.conversation_id) {
            room.remove(&msg.user_id);

            tracing::debug!(
                "User {} left conversation room {} ({} users remaining)",
                msg.user_id,
                msg.conversation_id,
                room.len()
            );

            if room.is_empty() {
                self.rooms.remove(&msg.conversation_id);
            }
        }
    }
}

impl Handler<BroadcastToRoom> for RealtimeServer {
    type Result = ();

    fn handle(&mut self, msg: BroadcastToRoom, _: &mut Context<Self>) {
        if let Some(room_users) = self.rooms.get(&msg.conversation_id) {
            let mut sent_count = 0;

            for &user_id in room_users {
                if let Some(skip_id) = msg.skip_user_id {
                    if user_id == skip_id {
                        continue;
                    }
                }

                if let Some(session_ids) = self.users.get(&user_id) {
                    for session_id in session_ids {
                        self.send_to_session(session_id, msg.message.clone());
                        sent_count += 1;
                    }
                }
            }

            tracing::debug!(
                "Broadcast to room {}: sent to {} sessions",
                msg.conversation_id,
                sent_count
            );
        } else {
            tracing::debug!(
                "Attempted to broadcast to a room with no subscribers: {}",
                msg.conversation_id
            );
        }
    }
}

impl Handler<SendToUser> for RealtimeServer {
    type Result = ();

    fn handle(&mut self, msg: SendToUser, _: &mut Context<Self>) {
        if let Some(session_ids) = self.users.get(&msg.user_id) {
            let session_count = session_ids.len();
            for session_id in session_ids {
                self.send_to_session(session_id, msg.message.clone());
            }
            tracing::debug!("Sent message to user {} ({} sessions)", msg.user_id, session_count);
        } else {
            tracing::debug!("User {} not online, message not delivered live", msg.user_id);
        }
    }
}

impl Handler<SendToUsers> for RealtimeServer {
    type Result = ();

    fn handle(&mut self, msg: SendToUsers, _: &mut Context<Self>) {
        let mut sent_count = 0;

        for user_id in &msg.user_ids {
            if let Some(session_ids) = self.users.get(user_id) {
                for session_id in session_ids {
                    self.send_to_session(session_id, msg.message.clone());
                    sent_count += 1;
                }
            }
        }

        tracing::debug!(
            "Sent message to {} users ({} total sessions)",
            msg.user_ids.len(),
            sent_count
        );
    }
}

impl Handler<GetOnlineUsers> for RealtimeServer {
    type Result = Vec<Uuid>;

    fn handle(&mut self, _: GetOnlineUsers, _: &mut Context<Self>) -> Self::Result {
        self.users.keys().copied().collect()
    }
}

impl Handler<BroadcastToAll> for RealtimeServer {
    type Result = ();

    fn handle(&mut self, msg: BroadcastToAll, _: &mut Context<Self>) {
        for session_addr in self.sessions.values() {
            session_addr.do_send(msg.message.clone());
        }

        tracing::debug!("Broadcast to all: {} sessions", self.sessions.len());
    }
}

/// Implement Message so ServerMessage can be sent straight to sessions
impl Message for ServerMessage {
    type Result = ();
}

impl Default for RealtimeServer {
    fn default() -> Self {
        Self::new()
    }
}

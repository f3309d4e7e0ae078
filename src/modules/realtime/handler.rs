/// WebSocket HTTP handler.
///
/// Upgrades the HTTP request and runs the bidirectional bridge:
/// - Inbound:  client -> WebSocket -> parse ClientMessage -> session actor
/// - Outbound: server actor -> session actor -> mpsc channel -> WebSocket
use actix::Addr;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_ws::Message;
use tokio::sync::mpsc;

use crate::modules::message::handle::MessageSvc;
use crate::modules::typing::handle::TypingSvc;
use crate::modules::user::service::UserService;

use super::message::ClientMessage;
use super::server::RealtimeServer;
use super::session::RealtimeSession;

/// Endpoint: GET /ws
pub async fn websocket_handler(
    req: HttpRequest,
    stream: web::Payload,
    server: web::Data<Addr<RealtimeServer>>,
    message_service: web::Data<MessageSvc>,
    typing_service: web::Data<TypingSvc>,
    user_service: web::Data<UserService>,
) -> Result<HttpResponse, Error> {
    tracing::debug!("WebSocket upgrade request from {:?}", req.peer_addr());

    let (response, mut ws_session, mut msg_stream) = actix_ws::handle(&req, stream)?;

    // mpsc channel: session actor sends JSON -> spawned task -> WebSocket
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    let ws_actor = RealtimeSession::new(
        server.get_ref().clone(),
        tx,
        message_service,
        typing_service,
        user_service,
    );

    use actix::Actor;
    let addr = ws_actor.start();

    actix_web::rt::spawn(async move {
        loop {
            tokio::select! {
                // === INBOUND: client -> server ===
                msg = msg_stream.recv() => {
                    match msg {
                        Some(Ok(Message::Text(text))) => {
                            let text_str = text.to_string();

                            match serde_json::from_str::<ClientMessage>(&text_str) {
                                Ok(client_msg) => {
                                    addr.do_send(client_msg);
                                }
                                Err(e) => {
                                    tracing::warn!(
                                        "Unparseable client message: {} - raw: {}",
                                        e,
                                        &text_str[..100.min(text_str.len())]
                                    );
                                }
                            }
                        }

                        Some(Ok(Message::Ping(data))) => {
                            if let Err(e) = ws_session.pong(&data).await {
                                tracing::error!("Failed to send pong: {}", e);
                                break;
                            }
                        }

                        Some(Ok(Message::Pong(_))) => {
                            // heartbeat response - ignore
                        }

                        Some(Ok(Message::Close(reason))) => {
                            tracing::info!("WebSocket close frame: {:?}", reason);
                            break;
                        }

                        Some(Ok(Message::Binary(_))) => {
                            tracing::warn!("Binary messages are not supported");
                        }

                        Some(Ok(Message::Continuation(_) | Message::Nop)) => {}

                        Some(Err(e)) => {
                            tracing::error!("WebSocket protocol error: {}", e);
                            break;
                        }

                        // stream ended (client disconnect)
                        None => break,
                    }
                }

                // === OUTBOUND: server -> client ===
                Some(json) = rx.recv() => {
                    if ws_session.text(json).await.is_err() {
                        tracing::error!("Failed to push to WebSocket client");
                        break;
                    }
                }
            }
        }

        let _ = ws_session.close(None).await;
        tracing::debug!("WebSocket message loop ended");
    });

    tracing::info!("WebSocket connection established");
    Ok(response)
}

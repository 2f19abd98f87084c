//! Axum WebSocket handler for the primary session channel
//!
//! Owns the whole per-client lifecycle: accept and register the session,
//! run the dispatch loop, and perform idempotent cleanup when the
//! connection goes away, however it goes away.

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::session::Session;
use crate::state::AppState;

use super::{
    dispatch::dispatch_message,
    messages::{ClientMessage, ServerMessage},
};

/// Channel buffer size for outbound session messages
const CHANNEL_BUFFER_SIZE: usize = 256;

/// WebSocket session handler
/// Upgrades the HTTP connection to WebSocket for the primary client channel
pub async fn client_ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Response {
    info!("client session connection upgrade requested");
    ws.on_upgrade(move |socket| handle_client_socket(socket, state))
}

/// Handle one client session from accept to teardown
async fn handle_client_socket(socket: WebSocket, app_state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();

    let (outbound_tx, mut outbound_rx) = mpsc::channel::<ServerMessage>(CHANNEL_BUFFER_SIZE);

    // Accept: fresh id, current config snapshot, registry entry
    let session = match app_state
        .sessions
        .insert(app_state.config_store.snapshot(), outbound_tx.clone())
    {
        Ok(session) => session,
        Err(e) => {
            error!("failed to register session: {e}");
            let _ = sender.send(Message::Close(None)).await;
            return;
        }
    };
    info!(session_id = %session.id, "client session established");

    // The socket has exactly one writer: this task. Everything else routes
    // through the outbound channel.
    let sender_task = tokio::spawn(async move {
        while let Some(message) = outbound_rx.recv().await {
            match serde_json::to_string(&message) {
                Ok(json) => {
                    if sender.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    error!("failed to serialize outgoing message: {e}");
                }
            }
        }
    });

    let _ = outbound_tx
        .send(ServerMessage::SessionReady {
            session_id: session.id,
        })
        .await;

    loop {
        tokio::select! {
            _ = session.cancel_token().cancelled() => {
                debug!(session_id = %session.id, "session cancelled, leaving dispatch loop");
                break;
            }
            next = receiver.next() => match next {
                Some(Ok(msg)) => {
                    if !process_frame(msg, &session, &outbound_tx, &app_state).await {
                        break;
                    }
                }
                Some(Err(e)) => {
                    warn!(session_id = %session.id, "client transport error: {e}");
                    break;
                }
                None => {
                    info!(session_id = %session.id, "client closed connection");
                    break;
                }
            }
        }
    }

    // Cleanup runs on every exit path; the registry removal is idempotent
    app_state.sessions.disconnect(session.id);
    sender_task.abort();
    info!(session_id = %session.id, "client session terminated");
}

/// Process one inbound frame; returns false to end the session
async fn process_frame(
    msg: Message,
    session: &Arc<Session>,
    outbound: &mpsc::Sender<ServerMessage>,
    app_state: &Arc<AppState>,
) -> bool {
    match msg {
        Message::Text(text) => {
            let incoming: ClientMessage = match serde_json::from_str(text.as_str()) {
                Ok(msg) => msg,
                Err(e) => {
                    warn!(session_id = %session.id, "failed to parse incoming message: {e}");
                    let _ = outbound
                        .send(ServerMessage::Error {
                            message: format!("Invalid message format: {e}"),
                        })
                        .await;
                    return true;
                }
            };
            dispatch_message(incoming, session, outbound, app_state).await
        }
        Message::Binary(data) => {
            debug!(session_id = %session.id, "unexpected binary frame: {} bytes", data.len());
            let _ = outbound
                .send(ServerMessage::Error {
                    message: "Binary frames are not accepted on the session channel".to_string(),
                })
                .await;
            true
        }
        Message::Ping(_) | Message::Pong(_) => true,
        Message::Close(_) => {
            info!(session_id = %session.id, "client sent close frame");
            false
        }
    }
}

//! Synthesis channel (`/tts-ws`)
//!
//! Dedicated WebSocket for speech generation so audio traffic never queues
//! behind conversation traffic. Accepts `{"text": "..."}` requests and
//! streams back `{"status": "partial", ...}` events followed by one
//! terminal `complete` or `error` per request. Requests on one connection
//! are processed one at a time, in arrival order.

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::core::pipeline::SynthesisEvent;
use crate::state::AppState;

/// Channel buffer size for outbound synthesis events
const CHANNEL_BUFFER_SIZE: usize = 64;

/// One inbound synthesis request
#[derive(Debug, Deserialize)]
struct SynthesisRequest {
    text: Option<String>,
}

/// WebSocket synthesis handler
pub async fn tts_ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    info!("synthesis channel connection upgrade requested");
    ws.on_upgrade(move |socket| handle_tts_socket(socket, state))
}

async fn handle_tts_socket(socket: WebSocket, app_state: Arc<AppState>) {
    info!("synthesis channel established");

    let (mut sender, mut receiver) = socket.split();
    let (events_tx, mut events_rx) = mpsc::channel::<SynthesisEvent>(CHANNEL_BUFFER_SIZE);

    let sender_task = tokio::spawn(async move {
        while let Some(event) = events_rx.recv().await {
            match serde_json::to_string(&event) {
                Ok(json) => {
                    if sender.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    error!("failed to serialize synthesis event: {e}");
                }
            }
        }
    });

    // Cancelled on teardown so a request in flight stops between units
    let cancel = CancellationToken::new();
    let pipeline = app_state.speech_pipeline();

    while let Some(frame) = receiver.next().await {
        match frame {
            Ok(Message::Text(raw)) => {
                let request: SynthesisRequest = match serde_json::from_str(raw.as_str()) {
                    Ok(request) => request,
                    Err(e) => {
                        warn!("malformed synthesis request, closing channel: {e}");
                        break;
                    }
                };

                // Absent or empty text is a deliberate no-op
                let Some(text) = request.text else { continue };

                info!("received text for synthesis: {text}");
                pipeline.run(&text, &cancel, &events_tx).await;
            }
            Ok(Message::Close(_)) => {
                info!("synthesis channel closed by client");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                warn!("synthesis channel transport error: {e}");
                break;
            }
        }
    }

    cancel.cancel();
    sender_task.abort();
    info!("synthesis channel terminated");
}

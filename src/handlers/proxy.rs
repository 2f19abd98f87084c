//! Relay channel (`/proxy-ws`)
//!
//! For each inbound client connection, opens one outbound connection to the
//! configured upstream server and pumps complete messages in both
//! directions, preserving the text/binary framing. Either side closing or
//! erroring tears down the whole link; the other side is closed rather than
//! left orphaned. Nothing is buffered across reconnects.

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::protocol::Message as UpstreamMessage;
use tracing::{debug, info, warn};

use crate::state::AppState;

/// Error types for relay operations
#[derive(Debug, Clone, thiserror::Error)]
pub enum RelayError {
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Connection lost: {0}")]
    ConnectionLost(String),
}

/// WebSocket relay handler
pub async fn proxy_ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    let upstream_url = state.config.upstream_url.clone();
    info!("relay connection upgrade requested (upstream: {upstream_url})");
    ws.on_upgrade(move |socket| handle_relay(socket, upstream_url))
}

/// Run one relay link from dial to teardown
async fn handle_relay(mut client: WebSocket, upstream_url: String) {
    // No link without an upstream: close the client right away
    let upstream = match connect_async(upstream_url.as_str()).await {
        Ok((stream, _)) => stream,
        Err(e) => {
            let err = RelayError::UpstreamUnavailable(e.to_string());
            warn!("{err}");
            let _ = client.send(Message::Close(None)).await;
            return;
        }
    };
    info!("relay link established to {upstream_url}");

    let (mut client_tx, mut client_rx) = client.split();
    let (mut upstream_tx, mut upstream_rx) = upstream.split();

    loop {
        tokio::select! {
            frame = client_rx.next() => match frame {
                Some(Ok(msg)) => {
                    if matches!(msg, Message::Close(_)) {
                        debug!("client closed relay link");
                        break;
                    }
                    if let Some(forward) = client_to_upstream(msg) {
                        if let Err(e) = upstream_tx.send(forward).await {
                            warn!("relay send to upstream failed: {e}");
                            break;
                        }
                    }
                }
                Some(Err(e)) => {
                    warn!("{}", RelayError::ConnectionLost(format!("client side: {e}")));
                    break;
                }
                None => {
                    debug!("client stream ended");
                    break;
                }
            },
            frame = upstream_rx.next() => match frame {
                Some(Ok(msg)) => {
                    if msg.is_close() {
                        debug!("upstream closed relay link");
                        break;
                    }
                    if let Some(forward) = upstream_to_client(msg) {
                        if let Err(e) = client_tx.send(forward).await {
                            warn!("relay send to client failed: {e}");
                            break;
                        }
                    }
                }
                Some(Err(e)) => {
                    warn!("{}", RelayError::ConnectionLost(format!("upstream side: {e}")));
                    break;
                }
                None => {
                    debug!("upstream stream ended");
                    break;
                }
            },
        }
    }

    // Whichever side ended first, close both so no orphaned socket remains
    let _ = upstream_tx.close().await;
    let _ = client_tx.close().await;
    info!("relay link closed");
}

/// Map a client frame onto the upstream protocol, verbatim
fn client_to_upstream(msg: Message) -> Option<UpstreamMessage> {
    match msg {
        Message::Text(text) => Some(UpstreamMessage::Text(text.as_str().into())),
        Message::Binary(data) => Some(UpstreamMessage::Binary(data)),
        Message::Ping(data) => Some(UpstreamMessage::Ping(data)),
        Message::Pong(data) => Some(UpstreamMessage::Pong(data)),
        Message::Close(_) => None,
    }
}

/// Map an upstream frame onto the client protocol, verbatim
fn upstream_to_client(msg: UpstreamMessage) -> Option<Message> {
    match msg {
        UpstreamMessage::Text(text) => Some(Message::Text(text.as_str().into())),
        UpstreamMessage::Binary(data) => Some(Message::Binary(data)),
        UpstreamMessage::Ping(data) => Some(Message::Ping(data)),
        UpstreamMessage::Pong(data) => Some(Message::Pong(data)),
        // Close is handled in the pump; raw frames never surface here
        UpstreamMessage::Close(_) | UpstreamMessage::Frame(_) => None,
    }
}

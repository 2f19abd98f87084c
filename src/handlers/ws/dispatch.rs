//! Message dispatch for the primary session channel
//!
//! Routes each parsed inbound message to its handler. Handler-level errors
//! are reported back over the session's outbound channel and never end the
//! dispatch loop.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::warn;

use crate::core::pipeline::SynthesisEvent;
use crate::session::Session;
use crate::state::AppState;

use super::messages::{ClientMessage, ServerMessage};

/// Route one message; returns false to end the session
pub async fn dispatch_message(
    msg: ClientMessage,
    session: &Arc<Session>,
    outbound: &mpsc::Sender<ServerMessage>,
    app_state: &Arc<AppState>,
) -> bool {
    match msg {
        ClientMessage::TextInput { text } => {
            match app_state.conversation.respond(session.id, &text).await {
                Ok(reply) => {
                    let _ = outbound.send(ServerMessage::Reply { text: reply }).await;
                }
                Err(e) => {
                    warn!(session_id = %session.id, "conversation turn failed: {e}");
                    let _ = outbound
                        .send(ServerMessage::Error {
                            message: e.to_string(),
                        })
                        .await;
                }
            }
            true
        }
        ClientMessage::Synthesize { text } => {
            run_synthesis(&text, session, outbound, app_state).await;
            true
        }
        ClientMessage::Interrupt => {
            app_state.conversation.interrupt(session.id).await;
            let _ = outbound.send(ServerMessage::InterruptAck).await;
            true
        }
    }
}

/// Run one synthesis request inline, streaming events to the client
///
/// Running inline serializes synthesis within the session (the dispatch
/// loop reads the next message only after this returns) while other
/// sessions proceed in parallel on their own tasks.
async fn run_synthesis(
    text: &str,
    session: &Arc<Session>,
    outbound: &mpsc::Sender<ServerMessage>,
    app_state: &Arc<AppState>,
) {
    let (events_tx, mut events_rx) = mpsc::channel::<SynthesisEvent>(16);

    let forward_out = outbound.clone();
    let forwarder = tokio::spawn(async move {
        while let Some(event) = events_rx.recv().await {
            if forward_out
                .send(ServerMessage::Synthesis(event))
                .await
                .is_err()
            {
                break;
            }
        }
    });

    app_state
        .speech_pipeline()
        .run(text, session.cancel_token(), &events_tx)
        .await;

    drop(events_tx);
    let _ = forwarder.await;
}

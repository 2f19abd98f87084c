//! Integration tests for the primary session channel
//!
//! Covers session announcement, handler-level error recovery, isolation
//! between concurrent sessions, and idempotent cleanup on disconnect.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};

use vocalis::core::asr::{AsrEngine, HttpAsrEngine};
use vocalis::core::conversation::EchoConversation;
use vocalis::core::tts::create_tts_engine;
use vocalis::{AppState, ServerConfig, routes};

fn test_state(config: ServerConfig) -> Arc<AppState> {
    let timeout = Duration::from_secs(config.engine_timeout_seconds);
    let asr: Arc<dyn AsrEngine> =
        Arc::new(HttpAsrEngine::new(config.asr_url.clone(), timeout).unwrap());
    let tts = create_tts_engine(&config.tts_provider, config.artifact_dir.clone(), timeout).unwrap();
    AppState::new(config, asr, tts, Arc::new(EchoConversation))
}

async fn spawn_app(state: Arc<AppState>) -> SocketAddr {
    let app = routes::api::create_api_router()
        .merge(routes::ws::create_ws_router())
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

type WsClient = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;

async fn connect_session(addr: SocketAddr) -> (WsClient, String) {
    let (mut ws_stream, _) = connect_async(format!("ws://{addr}/client-ws"))
        .await
        .expect("Failed to connect");

    let ready = next_json(&mut ws_stream).await;
    assert_eq!(ready["type"], "session-ready");
    let session_id = ready["session_id"].as_str().unwrap().to_string();
    (ws_stream, session_id)
}

async fn next_json(ws_stream: &mut WsClient) -> serde_json::Value {
    let msg = tokio::time::timeout(Duration::from_secs(5), ws_stream.next())
        .await
        .expect("timed out waiting for message")
        .expect("stream ended unexpectedly")
        .expect("websocket error");
    match msg {
        Message::Text(text) => serde_json::from_str(text.as_str()).unwrap(),
        other => panic!("expected text frame, got {other:?}"),
    }
}

/// Wait until the registry drops to the expected size
async fn wait_for_sessions(state: &Arc<AppState>, expected: usize) {
    let deadline = Instant::now() + Duration::from_secs(2);
    while state.sessions.len() != expected {
        assert!(
            Instant::now() < deadline,
            "registry never reached {expected} sessions (now {})",
            state.sessions.len()
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

#[tokio::test]
async fn server_assigns_and_announces_session_id() {
    let state = test_state(ServerConfig::default());
    let addr = spawn_app(state.clone()).await;

    let (mut ws_stream, session_id) = connect_session(addr).await;
    assert!(!session_id.is_empty());
    assert_eq!(state.sessions.len(), 1);

    ws_stream.close(None).await.unwrap();
    wait_for_sessions(&state, 0).await;
}

#[tokio::test]
async fn text_input_round_trips_through_conversation_engine() {
    let state = test_state(ServerConfig::default());
    let addr = spawn_app(state.clone()).await;

    let (mut ws_stream, _) = connect_session(addr).await;

    ws_stream
        .send(Message::Text(
            r#"{"type": "text-input", "text": "hello there"}"#.into(),
        ))
        .await
        .unwrap();

    let reply = next_json(&mut ws_stream).await;
    assert_eq!(reply["type"], "reply");
    assert_eq!(reply["text"], "hello there");

    ws_stream.close(None).await.unwrap();
}

#[tokio::test]
async fn handler_errors_do_not_terminate_the_session() {
    let state = test_state(ServerConfig::default());
    let addr = spawn_app(state.clone()).await;

    let (mut ws_stream, _) = connect_session(addr).await;

    // Garbage input is answered with an error message, not a close
    ws_stream
        .send(Message::Text("this is not json".into()))
        .await
        .unwrap();
    let error = next_json(&mut ws_stream).await;
    assert_eq!(error["type"], "error");

    // The same connection keeps working afterwards
    ws_stream
        .send(Message::Text(
            r#"{"type": "text-input", "text": "still alive"}"#.into(),
        ))
        .await
        .unwrap();
    let reply = next_json(&mut ws_stream).await;
    assert_eq!(reply["text"], "still alive");

    ws_stream.close(None).await.unwrap();
}

#[tokio::test]
async fn interrupt_is_acknowledged() {
    let state = test_state(ServerConfig::default());
    let addr = spawn_app(state).await;

    let (mut ws_stream, _) = connect_session(addr).await;

    ws_stream
        .send(Message::Text(r#"{"type": "interrupt"}"#.into()))
        .await
        .unwrap();
    let ack = next_json(&mut ws_stream).await;
    assert_eq!(ack["type"], "interrupt-ack");

    ws_stream.close(None).await.unwrap();
}

#[tokio::test]
async fn killing_one_session_leaves_the_other_untouched() {
    let state = test_state(ServerConfig::default());
    let addr = spawn_app(state.clone()).await;

    let (ws_a, session_a) = connect_session(addr).await;
    let (mut ws_b, session_b) = connect_session(addr).await;
    assert_ne!(session_a, session_b);
    assert_eq!(state.sessions.len(), 2);

    // Abrupt drop of A, no close handshake
    drop(ws_a);
    wait_for_sessions(&state, 1).await;

    // B's registry entry and dispatch loop are untouched
    let remaining = uuid::Uuid::parse_str(&session_b).unwrap();
    assert!(state.sessions.get(remaining).is_some());

    ws_b.send(Message::Text(
        r#"{"type": "text-input", "text": "b survives"}"#.into(),
    ))
    .await
    .unwrap();
    let reply = next_json(&mut ws_b).await;
    assert_eq!(reply["text"], "b survives");

    ws_b.close(None).await.unwrap();
    wait_for_sessions(&state, 0).await;
}

#[tokio::test]
async fn registry_exhaustion_fails_only_the_new_connection() {
    let config = ServerConfig {
        max_sessions: 1,
        ..Default::default()
    };
    let state = test_state(config);
    let addr = spawn_app(state.clone()).await;

    let (mut ws_a, _) = connect_session(addr).await;

    // The registry is full: the second connection is closed without a
    // session-ready announcement
    let (mut ws_b, _) = connect_async(format!("ws://{addr}/client-ws")).await.unwrap();
    let rejected = tokio::time::timeout(Duration::from_secs(2), ws_b.next())
        .await
        .expect("timed out waiting for rejection");
    match rejected {
        None | Some(Ok(Message::Close(_))) | Some(Err(_)) => {}
        Some(Ok(other)) => panic!("expected close, got {other:?}"),
    }

    // The established session is unaffected
    ws_a.send(Message::Text(
        r#"{"type": "text-input", "text": "still here"}"#.into(),
    ))
    .await
    .unwrap();
    let reply = next_json(&mut ws_a).await;
    assert_eq!(reply["text"], "still here");

    ws_a.close(None).await.unwrap();
}

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::handlers::{proxy, tts_ws, ws};
use crate::state::AppState;
use std::sync::Arc;

/// Create the WebSocket router
///
/// Three mutually exclusive persistent channels: the primary session
/// channel, the relay to the configured upstream, and the dedicated
/// synthesis channel (kept separate so audio generation never queues
/// behind conversation traffic).
pub fn create_ws_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/client-ws", get(ws::client_ws_handler))
        .route("/proxy-ws", get(proxy::proxy_ws_handler))
        .route("/tts-ws", get(tts_ws::tts_ws_handler))
        .layer(TraceLayer::new_for_http())
}

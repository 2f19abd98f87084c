use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers::{asr, config, voices};
use crate::state::AppState;
use std::sync::Arc;

pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/asr", post(asr::transcribe_audio))
        .route("/voices", get(voices::list_voices))
        .route("/config", post(config::update_config))
        .route("/health", get(config::health))
        .layer(TraceLayer::new_for_http())
}

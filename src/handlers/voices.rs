//! Voice listing endpoint (`GET /voices`)

use axum::{Json, extract::State};
use serde::Serialize;
use std::sync::Arc;

use crate::core::tts::VoiceInfo;
use crate::state::AppState;

/// Voice catalog for the configured TTS provider
#[derive(Debug, Serialize)]
pub struct VoicesResponse {
    pub status: &'static str,
    pub provider: &'static str,
    pub count: usize,
    pub voices: Vec<VoiceInfo>,
}

pub async fn list_voices(State(state): State<Arc<AppState>>) -> Json<VoicesResponse> {
    let snapshot = state.config_store.snapshot();
    let voices = snapshot.tts.voices();

    Json(VoicesResponse {
        status: "success",
        provider: snapshot.tts.name(),
        count: voices.len(),
        voices,
    })
}

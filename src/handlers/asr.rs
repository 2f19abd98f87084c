//! Transcription endpoint (`POST /asr`)
//!
//! Accepts a binary audio payload (WAV container, 16-bit PCM body) and
//! returns the transcript. Format problems are the caller's fault (400),
//! engine problems are ours (500); the two read differently on the wire.

use axum::{Json, extract::State};
use bytes::Bytes;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use crate::errors::app_error::AppResult;
use crate::state::AppState;

/// Successful transcription response
#[derive(Debug, Serialize)]
pub struct TranscriptionResponse {
    pub text: String,
}

pub async fn transcribe_audio(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> AppResult<Json<TranscriptionResponse>> {
    info!("received audio payload for transcription: {} bytes", body.len());

    let text = state.transcription().transcribe(&body).await?;

    info!("transcription result: {text}");
    Ok(Json(TranscriptionResponse { text }))
}

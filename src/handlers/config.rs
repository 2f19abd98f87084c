//! Configuration endpoints
//!
//! `POST /config` applies a partial update by installing a fresh snapshot;
//! sessions created before the update keep the snapshot they started with.
//! `GET /health` is a plain liveness probe.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::info;

use crate::config::ConfigUpdate;
use crate::state::AppState;

/// Request body for partial configuration updates
#[derive(Debug, Deserialize)]
pub struct ConfigUpdateRequest {
    pub character: Option<String>,
    pub voice: Option<String>,
}

/// Response echoing what was applied
#[derive(Debug, Serialize)]
pub struct ConfigUpdateResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub applied: AppliedUpdate,
}

#[derive(Debug, Serialize)]
pub struct AppliedUpdate {
    pub character: String,
    pub voice: String,
}

pub async fn update_config(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ConfigUpdateRequest>,
) -> Json<ConfigUpdateResponse> {
    info!(
        "partial config update request - character: {:?}, voice: {:?}",
        request.character, request.voice
    );

    let snapshot = state.config_store.apply(ConfigUpdate {
        character: request.character,
        voice: request.voice,
    });

    Json(ConfigUpdateResponse {
        status: "success",
        message: "Configuration updated successfully",
        applied: AppliedUpdate {
            character: snapshot.character.clone(),
            voice: snapshot.tts.voice().to_string(),
        },
    })
}

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

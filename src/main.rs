use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;

use vocalis::core::asr::{AsrEngine, HttpAsrEngine};
use vocalis::core::conversation::EchoConversation;
use vocalis::core::tts::create_tts_engine;
use vocalis::{AppState, ServerConfig, routes};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let config = ServerConfig::from_env()
        .map_err(|e| anyhow::anyhow!("failed to load configuration: {e}"))?;

    // The artifact store must exist before the first synthesis request
    tokio::fs::create_dir_all(&config.artifact_dir)
        .await
        .with_context(|| format!("failed to create artifact dir {}", config.artifact_dir.display()))?;

    let engine_timeout = Duration::from_secs(config.engine_timeout_seconds);
    let asr: Arc<dyn AsrEngine> = Arc::new(
        HttpAsrEngine::new(config.asr_url.clone(), engine_timeout)
            .map_err(|e| anyhow::anyhow!("failed to build ASR engine: {e}"))?,
    );
    let tts = create_tts_engine(&config.tts_provider, config.artifact_dir.clone(), engine_timeout)
        .map_err(|e| anyhow::anyhow!("failed to build TTS engine: {e}"))?;

    // Turn-taking backend is external; run with the built-in stand-in
    let conversation = Arc::new(EchoConversation);

    let address = config.address();
    let state = AppState::new(config, asr, tts, conversation);

    let app = routes::api::create_api_router()
        .merge(routes::ws::create_ws_router())
        .with_state(state);

    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    info!("vocalis listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}

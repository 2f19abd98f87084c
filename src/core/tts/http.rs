//! HTTP-backed TTS engine
//!
//! Posts one sentence at a time to a synthesis sidecar and writes the
//! returned audio bytes into the artifact store under the caller-supplied
//! unique name. The wire contract is `{"text": ..., "voice": ...}` in, raw
//! audio bytes out.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use super::base::{TtsEngine, TtsError, TtsResult};
use super::provider::TtsProviderConfig;

#[derive(Serialize)]
struct SynthesizeRequest<'a> {
    text: &'a str,
    voice: &'a str,
}

/// TTS engine talking to an HTTP synthesis service
pub struct HttpTtsEngine {
    client: reqwest::Client,
    endpoint: String,
    voice: String,
    artifact_dir: PathBuf,
    file_extension: &'static str,
}

impl HttpTtsEngine {
    pub fn new(
        endpoint: String,
        voice: String,
        artifact_dir: PathBuf,
        file_extension: &'static str,
        request_timeout: Duration,
    ) -> TtsResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| TtsError::Network(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            endpoint,
            voice,
            artifact_dir,
            file_extension,
        })
    }
}

#[async_trait]
impl TtsEngine for HttpTtsEngine {
    async fn synthesize(&self, text: &str, file_stem: &str) -> TtsResult<PathBuf> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&SynthesizeRequest {
                text,
                voice: &self.voice,
            })
            .send()
            .await
            .map_err(|e| TtsError::Network(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(TtsError::Provider(format!("API error ({status}): {body}")));
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| TtsError::Network(format!("failed to read audio body: {e}")))?;

        let path = self
            .artifact_dir
            .join(format!("{file_stem}.{}", self.file_extension));
        tokio::fs::write(&path, &audio)
            .await
            .map_err(|e| TtsError::Store(format!("failed to write {}: {e}", path.display())))?;

        debug!("wrote {} bytes of audio to {}", audio.len(), path.display());
        Ok(path)
    }
}

/// Build the TTS engine for the selected provider kind
///
/// Each kind carries its own typed configuration; the selection is this one
/// match. All current kinds are HTTP sidecars, so they share the engine
/// implementation and differ in endpoint, voice, and artifact format.
pub fn create_tts_engine(
    provider: &TtsProviderConfig,
    artifact_dir: PathBuf,
    request_timeout: Duration,
) -> TtsResult<Arc<dyn TtsEngine>> {
    let engine = match provider {
        TtsProviderConfig::EdgeTts(config) => HttpTtsEngine::new(
            config.endpoint.clone(),
            config.voice.clone(),
            artifact_dir,
            provider.file_extension(),
            request_timeout,
        )?,
        TtsProviderConfig::AzureTts(config) => HttpTtsEngine::new(
            config.endpoint.clone(),
            config.voice.clone(),
            artifact_dir,
            provider.file_extension(),
            request_timeout,
        )?,
        TtsProviderConfig::MeloTts(config) => HttpTtsEngine::new(
            config.endpoint.clone(),
            config.speaker.clone(),
            artifact_dir,
            provider.file_extension(),
            request_timeout,
        )?,
    };
    Ok(Arc::new(engine))
}

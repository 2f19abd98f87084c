//! Transcription service
//!
//! Wraps the ASR engine with the validation pipeline for uploaded audio:
//! container checks, sample decoding, empty-input rejection, then the
//! engine call under a bounded timeout. Each step fails with a distinct
//! error kind; there are no retries.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tracing::debug;

use super::asr::AsrEngine;
use super::audio::decode_wav_pcm16;

/// Typed transcription failures
///
/// `InvalidFormat` and `EmptyAudio` are caller errors (4xx-equivalent);
/// `TranscriptionFailed` is an engine error (5xx-equivalent).
#[derive(Debug, Clone, thiserror::Error)]
pub enum TranscriptionError {
    #[error("Invalid audio format: {0}")]
    InvalidFormat(String),

    #[error("Empty audio data")]
    EmptyAudio,

    #[error("Transcription failed: {0}")]
    TranscriptionFailed(String),
}

/// ASR engine wrapper with input validation and timeout
pub struct TranscriptionService {
    engine: Arc<dyn AsrEngine>,
    engine_timeout: Duration,
}

impl TranscriptionService {
    pub fn new(engine: Arc<dyn AsrEngine>, engine_timeout: Duration) -> Self {
        Self {
            engine,
            engine_timeout,
        }
    }

    /// Transcribe a raw audio container into text
    pub async fn transcribe(&self, raw: &[u8]) -> Result<String, TranscriptionError> {
        let samples = decode_wav_pcm16(raw)
            .map_err(|e| TranscriptionError::InvalidFormat(e.to_string()))?;

        if samples.is_empty() {
            return Err(TranscriptionError::EmptyAudio);
        }

        debug!("decoded {} samples for transcription", samples.len());

        match timeout(self.engine_timeout, self.engine.transcribe(&samples)).await {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => Err(TranscriptionError::TranscriptionFailed(e.to_string())),
            Err(_) => Err(TranscriptionError::TranscriptionFailed(format!(
                "engine timed out after {}s",
                self.engine_timeout.as_secs()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::asr::{AsrError, AsrResult};
    use crate::core::audio::WAV_HEADER_LEN;
    use async_trait::async_trait;

    struct FixedEngine(AsrResult<String>);

    #[async_trait]
    impl AsrEngine for FixedEngine {
        async fn transcribe(&self, _samples: &[f32]) -> AsrResult<String> {
            self.0.clone()
        }
    }

    fn service(result: AsrResult<String>) -> TranscriptionService {
        TranscriptionService::new(Arc::new(FixedEngine(result)), Duration::from_secs(1))
    }

    fn payload(sample_bytes: usize) -> Vec<u8> {
        vec![0u8; WAV_HEADER_LEN + sample_bytes]
    }

    #[tokio::test]
    async fn short_input_is_invalid_format() {
        let err = service(Ok("hi".into()))
            .transcribe(&[0u8; WAV_HEADER_LEN - 1])
            .await
            .unwrap_err();
        assert!(matches!(err, TranscriptionError::InvalidFormat(_)));
    }

    #[tokio::test]
    async fn odd_body_is_invalid_format() {
        let err = service(Ok("hi".into()))
            .transcribe(&payload(3))
            .await
            .unwrap_err();
        assert!(matches!(err, TranscriptionError::InvalidFormat(_)));
    }

    #[tokio::test]
    async fn header_only_is_empty_audio() {
        let err = service(Ok("hi".into()))
            .transcribe(&payload(0))
            .await
            .unwrap_err();
        assert!(matches!(err, TranscriptionError::EmptyAudio));
    }

    #[tokio::test]
    async fn valid_payload_returns_engine_text() {
        let text = service(Ok("hello there".into()))
            .transcribe(&payload(640))
            .await
            .unwrap();
        assert_eq!(text, "hello there");
    }

    #[tokio::test]
    async fn engine_failure_is_transcription_failed() {
        let err = service(Err(AsrError::Provider("model exploded".into())))
            .transcribe(&payload(640))
            .await
            .unwrap_err();
        match err {
            TranscriptionError::TranscriptionFailed(msg) => assert!(msg.contains("model exploded")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}

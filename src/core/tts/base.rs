//! TTS engine trait
//!
//! Speech synthesis is a black box behind this trait: one sentence of text
//! in, a reference to the generated audio artifact out. The streaming
//! pipeline owns segmentation, ordering, and timeout handling around it.

use std::path::PathBuf;

use async_trait::async_trait;

/// Error types for TTS engine operations
#[derive(Debug, Clone, thiserror::Error)]
pub enum TtsError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Artifact store error: {0}")]
    Store(String),
}

/// Result type for TTS operations
pub type TtsResult<T> = Result<T, TtsError>;

/// Base trait for text-to-speech engines
#[async_trait]
pub trait TtsEngine: Send + Sync {
    /// Synthesize one sentence into an audio artifact
    ///
    /// `file_stem` is the extension-less artifact name supplied by the
    /// caller; it must be globally unique so concurrent sessions can share
    /// the append-only artifact store without coordination. Returns the path
    /// of the written artifact.
    async fn synthesize(&self, text: &str, file_stem: &str) -> TtsResult<PathBuf>;
}

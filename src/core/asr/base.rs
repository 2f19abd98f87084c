//! ASR engine trait
//!
//! The gateway treats speech recognition as a black box behind this trait:
//! normalized samples in, text out. Concrete engines (HTTP sidecars, local
//! models) implement it; the transcription service owns validation and
//! timeout handling around it.

use async_trait::async_trait;

/// Error types for ASR engine operations
#[derive(Debug, Clone, thiserror::Error)]
pub enum AsrError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Provider error: {0}")]
    Provider(String),
}

/// Result type for ASR operations
pub type AsrResult<T> = Result<T, AsrError>;

/// Base trait for speech-to-text engines
#[async_trait]
pub trait AsrEngine: Send + Sync {
    /// Transcribe normalized mono samples ([-1.0, 1.0]) into text
    async fn transcribe(&self, samples: &[f32]) -> AsrResult<String>;
}

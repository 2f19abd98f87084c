use std::sync::Arc;
use std::time::Duration;

use crate::config::{ConfigStore, ServerConfig};
use crate::core::asr::AsrEngine;
use crate::core::conversation::ConversationEngine;
use crate::core::pipeline::SpeechPipeline;
use crate::core::transcribe::TranscriptionService;
use crate::core::tts::TtsEngine;
use crate::session::SessionRegistry;

/// Application state that can be shared across handlers
pub struct AppState {
    pub config: ServerConfig,
    /// Holder of the current per-session configuration snapshot
    pub config_store: ConfigStore,
    /// Process-wide session registry for the primary channel
    pub sessions: SessionRegistry,
    pub asr: Arc<dyn AsrEngine>,
    pub tts: Arc<dyn TtsEngine>,
    pub conversation: Arc<dyn ConversationEngine>,
}

impl AppState {
    pub fn new(
        config: ServerConfig,
        asr: Arc<dyn AsrEngine>,
        tts: Arc<dyn TtsEngine>,
        conversation: Arc<dyn ConversationEngine>,
    ) -> Arc<Self> {
        let config_store = ConfigStore::new(config.initial_snapshot());
        let sessions = SessionRegistry::new(config.max_sessions);

        Arc::new(Self {
            config,
            config_store,
            sessions,
            asr,
            tts,
            conversation,
        })
    }

    fn engine_timeout(&self) -> Duration {
        Duration::from_secs(self.config.engine_timeout_seconds)
    }

    /// Synthesis pipeline bound to the configured engine and timeout
    pub fn speech_pipeline(&self) -> SpeechPipeline {
        SpeechPipeline::new(self.tts.clone(), self.engine_timeout())
    }

    /// Transcription service bound to the configured engine and timeout
    pub fn transcription(&self) -> TranscriptionService {
        TranscriptionService::new(self.asr.clone(), self.engine_timeout())
    }
}

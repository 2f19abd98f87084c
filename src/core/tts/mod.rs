pub mod base;
pub mod http;
pub mod provider;

pub use base::{TtsEngine, TtsError, TtsResult};
pub use http::{HttpTtsEngine, create_tts_engine};
pub use provider::{TtsProviderConfig, VoiceInfo};

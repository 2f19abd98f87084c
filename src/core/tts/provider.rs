//! TTS provider selection
//!
//! The supported providers form a closed set: a tagged enum where each kind
//! carries its own typed configuration. Voice listing and field selection
//! are a single `match` over the kind, never reflection over field names.

use std::env;

use serde::{Deserialize, Serialize};

/// One entry of a provider's voice catalog
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct VoiceInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub language: &'static str,
}

/// Edge TTS settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeTtsConfig {
    /// HTTP endpoint of the synthesis sidecar
    pub endpoint: String,
    pub voice: String,
}

impl Default for EdgeTtsConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:5061/synthesize".to_string(),
            voice: "en-US-AvaMultilingualNeural".to_string(),
        }
    }
}

/// Azure TTS settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AzureTtsConfig {
    pub endpoint: String,
    pub voice: String,
    pub region: Option<String>,
}

impl Default for AzureTtsConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:5062/synthesize".to_string(),
            voice: "en-US-AshleyNeural".to_string(),
            region: None,
        }
    }
}

/// Melo TTS settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeloTtsConfig {
    pub endpoint: String,
    /// Melo calls its voices "speakers"
    pub speaker: String,
    pub speed: Option<f32>,
}

impl Default for MeloTtsConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:5063/synthesize".to_string(),
            speaker: "EN-Default".to_string(),
            speed: None,
        }
    }
}

/// TTS provider selection with typed per-provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "snake_case")]
pub enum TtsProviderConfig {
    EdgeTts(EdgeTtsConfig),
    AzureTts(AzureTtsConfig),
    MeloTts(MeloTtsConfig),
}

impl Default for TtsProviderConfig {
    fn default() -> Self {
        TtsProviderConfig::EdgeTts(EdgeTtsConfig::default())
    }
}

impl TtsProviderConfig {
    /// Build the provider configuration from environment variables
    ///
    /// `TTS_PROVIDER` selects the kind; `TTS_ENGINE_URL` and `TTS_VOICE`
    /// override the kind's defaults.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let provider = env::var("TTS_PROVIDER").unwrap_or_else(|_| "edge_tts".to_string());
        let mut config = match provider.as_str() {
            "edge_tts" => TtsProviderConfig::EdgeTts(EdgeTtsConfig::default()),
            "azure_tts" => TtsProviderConfig::AzureTts(AzureTtsConfig::default()),
            "melo_tts" => TtsProviderConfig::MeloTts(MeloTtsConfig::default()),
            other => {
                return Err(format!(
                    "Unknown TTS_PROVIDER '{other}' (expected edge_tts, azure_tts or melo_tts)"
                )
                .into());
            }
        };

        if let Ok(endpoint) = env::var("TTS_ENGINE_URL") {
            config = config.with_endpoint(endpoint);
        }
        if let Ok(voice) = env::var("TTS_VOICE") {
            config = config.with_voice(&voice);
        }
        Ok(config)
    }

    /// Stable provider name, matching the wire-level `provider` tag
    pub fn name(&self) -> &'static str {
        match self {
            TtsProviderConfig::EdgeTts(_) => "edge_tts",
            TtsProviderConfig::AzureTts(_) => "azure_tts",
            TtsProviderConfig::MeloTts(_) => "melo_tts",
        }
    }

    /// HTTP endpoint of the selected provider
    pub fn endpoint(&self) -> &str {
        match self {
            TtsProviderConfig::EdgeTts(c) => &c.endpoint,
            TtsProviderConfig::AzureTts(c) => &c.endpoint,
            TtsProviderConfig::MeloTts(c) => &c.endpoint,
        }
    }

    /// Active voice (Melo calls it the speaker)
    pub fn voice(&self) -> &str {
        match self {
            TtsProviderConfig::EdgeTts(c) => &c.voice,
            TtsProviderConfig::AzureTts(c) => &c.voice,
            TtsProviderConfig::MeloTts(c) => &c.speaker,
        }
    }

    /// Copy of this configuration with the voice replaced
    pub fn with_voice(&self, voice: &str) -> Self {
        let mut next = self.clone();
        match &mut next {
            TtsProviderConfig::EdgeTts(c) => c.voice = voice.to_string(),
            TtsProviderConfig::AzureTts(c) => c.voice = voice.to_string(),
            TtsProviderConfig::MeloTts(c) => c.speaker = voice.to_string(),
        }
        next
    }

    /// Copy of this configuration with the endpoint replaced
    pub fn with_endpoint(&self, endpoint: String) -> Self {
        let mut next = self.clone();
        match &mut next {
            TtsProviderConfig::EdgeTts(c) => c.endpoint = endpoint,
            TtsProviderConfig::AzureTts(c) => c.endpoint = endpoint,
            TtsProviderConfig::MeloTts(c) => c.endpoint = endpoint,
        }
        next
    }

    /// File extension of the artifacts the provider produces
    pub fn file_extension(&self) -> &'static str {
        match self {
            TtsProviderConfig::EdgeTts(_) => "mp3",
            TtsProviderConfig::AzureTts(_) => "wav",
            TtsProviderConfig::MeloTts(_) => "wav",
        }
    }

    /// Voice catalog for the selected provider
    pub fn voices(&self) -> Vec<VoiceInfo> {
        match self {
            TtsProviderConfig::EdgeTts(_) => vec![
                VoiceInfo { id: "en-US-AvaMultilingualNeural", name: "Ava (English US, Multilingual)", language: "en-US" },
                VoiceInfo { id: "en-US-AndrewMultilingualNeural", name: "Andrew (English US, Multilingual)", language: "en-US" },
                VoiceInfo { id: "en-US-EmmaMultilingualNeural", name: "Emma (English US, Multilingual)", language: "en-US" },
                VoiceInfo { id: "en-US-BrianMultilingualNeural", name: "Brian (English US, Multilingual)", language: "en-US" },
                VoiceInfo { id: "en-GB-SoniaNeural", name: "Sonia (English UK)", language: "en-GB" },
                VoiceInfo { id: "en-GB-RyanNeural", name: "Ryan (English UK)", language: "en-GB" },
                VoiceInfo { id: "zh-CN-XiaoxiaoNeural", name: "Xiaoxiao (Chinese)", language: "zh-CN" },
                VoiceInfo { id: "zh-CN-YunxiNeural", name: "Yunxi (Chinese)", language: "zh-CN" },
                VoiceInfo { id: "ja-JP-NanamiNeural", name: "Nanami (Japanese)", language: "ja-JP" },
                VoiceInfo { id: "ja-JP-KeitaNeural", name: "Keita (Japanese)", language: "ja-JP" },
            ],
            TtsProviderConfig::AzureTts(_) => vec![
                VoiceInfo { id: "en-US-AshleyNeural", name: "Ashley (English US)", language: "en-US" },
                VoiceInfo { id: "en-US-BrandonNeural", name: "Brandon (English US)", language: "en-US" },
                VoiceInfo { id: "zh-CN-XiaoxiaoNeural", name: "Xiaoxiao (Chinese)", language: "zh-CN" },
            ],
            TtsProviderConfig::MeloTts(_) => vec![
                VoiceInfo { id: "EN-Default", name: "English Default", language: "EN" },
                VoiceInfo { id: "EN-US", name: "English US", language: "EN" },
                VoiceInfo { id: "EN-BR", name: "English British", language: "EN" },
                VoiceInfo { id: "EN-AU", name: "English Australian", language: "EN" },
                VoiceInfo { id: "ZH", name: "Chinese", language: "ZH" },
            ],
        }
    }
}

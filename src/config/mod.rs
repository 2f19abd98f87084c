//! Configuration module for the Vocalis gateway
//!
//! Server configuration is read from environment variables (with a `.env`
//! file honored when present). Per-session configuration lives in immutable
//! [`ConfigSnapshot`]s handed out by the [`ConfigStore`]: updates install a
//! new snapshot, they never mutate one a live session already holds.

use std::env;
use std::path::PathBuf;

mod snapshot;

pub use snapshot::{ConfigSnapshot, ConfigStore, ConfigUpdate};

use crate::core::tts::provider::TtsProviderConfig;

/// Server configuration
///
/// Covers the listen address, the relay upstream, the audio artifact store,
/// and the engine endpoints the gateway talks to.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    // Server settings
    pub host: String,
    pub port: u16,

    /// WebSocket URL the relay channel forwards to
    pub upstream_url: String,

    /// Directory generated audio artifacts are written to (append-only,
    /// globally unique file names, so no locking is needed)
    pub artifact_dir: PathBuf,

    /// HTTP endpoint of the ASR engine
    pub asr_url: String,

    /// TTS provider selection with its typed per-provider settings
    pub tts_provider: TtsProviderConfig,

    /// Upper bound for a single engine call (ASR or per-sentence TTS)
    pub engine_timeout_seconds: u64,

    /// Maximum number of concurrently registered sessions
    pub max_sessions: usize,

    /// Character preset recorded in new session snapshots
    pub character: String,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// Reads configuration from environment variables, with sensible
    /// defaults. Also loads from a .env file if present using dotenvy.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        // Load .env file if it exists
        let _ = dotenvy::dotenv();

        // Server configuration
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "12393".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid port number: {e}"))?;

        // Relay upstream
        let upstream_url =
            env::var("UPSTREAM_WS_URL").unwrap_or_else(|_| "ws://localhost:12393/client-ws".to_string());

        // Audio artifact store
        let artifact_dir = env::var("ARTIFACT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("cache"));

        // Engine endpoints
        let asr_url =
            env::var("ASR_ENGINE_URL").unwrap_or_else(|_| "http://localhost:5060/transcribe".to_string());
        let tts_provider = TtsProviderConfig::from_env()?;

        let engine_timeout_seconds = env::var("ENGINE_TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(30);

        let max_sessions = env::var("MAX_SESSIONS")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(256);

        let character = env::var("CHARACTER_NAME").unwrap_or_else(|_| "default".to_string());

        let config = ServerConfig {
            host,
            port,
            upstream_url,
            artifact_dir,
            asr_url,
            tts_provider,
            engine_timeout_seconds,
            max_sessions,
            character,
        };
        config.validate()?;

        Ok(config)
    }

    /// Validate the loaded configuration
    ///
    /// Checks the parts that would otherwise only fail at first use.
    pub fn validate(&self) -> Result<(), Box<dyn std::error::Error>> {
        if !self.upstream_url.starts_with("ws://") && !self.upstream_url.starts_with("wss://") {
            return Err(format!(
                "UPSTREAM_WS_URL must be a ws:// or wss:// URL, got: {}",
                self.upstream_url
            )
            .into());
        }
        if self.engine_timeout_seconds == 0 {
            return Err("ENGINE_TIMEOUT_SECONDS must be greater than zero".into());
        }
        if self.max_sessions == 0 {
            return Err("MAX_SESSIONS must be greater than zero".into());
        }
        Ok(())
    }

    /// Listen address in `host:port` form
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Initial per-session snapshot derived from the server configuration
    pub fn initial_snapshot(&self) -> ConfigSnapshot {
        ConfigSnapshot {
            character: self.character.clone(),
            tts: self.tts_provider.clone(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
            upstream_url: "ws://localhost:12393/client-ws".to_string(),
            artifact_dir: PathBuf::from("cache"),
            asr_url: "http://localhost:5060/transcribe".to_string(),
            tts_provider: TtsProviderConfig::default(),
            engine_timeout_seconds: 30,
            max_sessions: 256,
            character: "default".to_string(),
        }
    }
}

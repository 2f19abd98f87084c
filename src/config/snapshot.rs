//! Immutable per-session configuration snapshots
//!
//! A session captures the snapshot that is current when it is accepted and
//! keeps it for its whole lifetime. Updates build a new snapshot and swap it
//! in; they never mutate a shared instance, so concurrent sessions cannot
//! observe torn reads.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::core::tts::provider::TtsProviderConfig;

/// Configuration captured at session creation time
#[derive(Debug, Clone)]
pub struct ConfigSnapshot {
    /// Character preset the session runs with
    pub character: String,
    /// TTS provider selection, including the active voice
    pub tts: TtsProviderConfig,
}

/// Partial update applied on top of the current snapshot
#[derive(Debug, Default, Clone)]
pub struct ConfigUpdate {
    pub character: Option<String>,
    pub voice: Option<String>,
}

/// Holder of the current global snapshot
///
/// Reads clone an `Arc`; writes build a fresh snapshot and replace the Arc.
/// Sessions created before an update keep the snapshot they started with.
pub struct ConfigStore {
    current: RwLock<Arc<ConfigSnapshot>>,
}

impl ConfigStore {
    pub fn new(initial: ConfigSnapshot) -> Self {
        Self {
            current: RwLock::new(Arc::new(initial)),
        }
    }

    /// Current snapshot
    pub fn snapshot(&self) -> Arc<ConfigSnapshot> {
        self.current.read().clone()
    }

    /// Apply a partial update, installing and returning the new snapshot
    pub fn apply(&self, update: ConfigUpdate) -> Arc<ConfigSnapshot> {
        let mut next = ConfigSnapshot::clone(&self.snapshot());
        if let Some(character) = update.character {
            next.character = character;
        }
        if let Some(voice) = update.voice {
            next.tts = next.tts.with_voice(&voice);
        }
        let next = Arc::new(next);
        *self.current.write() = next.clone();
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> ConfigStore {
        ConfigStore::new(ConfigSnapshot {
            character: "default".to_string(),
            tts: TtsProviderConfig::default(),
        })
    }

    #[test]
    fn apply_installs_new_snapshot() {
        let store = store();
        let before = store.snapshot();

        let after = store.apply(ConfigUpdate {
            character: Some("mao".to_string()),
            voice: None,
        });

        assert_eq!(after.character, "mao");
        assert_eq!(store.snapshot().character, "mao");
        // The previously taken snapshot is untouched
        assert_eq!(before.character, "default");
    }

    #[test]
    fn voice_update_goes_through_provider_config() {
        let store = store();
        let after = store.apply(ConfigUpdate {
            character: None,
            voice: Some("en-GB-SoniaNeural".to_string()),
        });
        assert_eq!(after.tts.voice(), "en-GB-SoniaNeural");
    }

    #[test]
    fn empty_update_is_a_noop() {
        let store = store();
        let before = store.snapshot();
        let after = store.apply(ConfigUpdate::default());
        assert_eq!(before.character, after.character);
        assert_eq!(before.tts.voice(), after.tts.voice());
    }
}

//! Streaming speech synthesis pipeline
//!
//! Consumes one synthesis request at a time: segments the text into
//! sentence units, synthesizes each unit in order, and emits events over
//! the supplied channel. Per request: zero or more `Partial` events in
//! source order, then exactly one terminal `Complete` or `Failed`; nothing
//! after the terminal event. Requests are independent; different
//! connections run their own pipelines in parallel.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::segment::split_sentences;
use super::tts::TtsEngine;

/// Event emitted while a synthesis request is processed
///
/// Serialized with a `status` tag to match the synthesis channel wire
/// format: `{"status":"partial","audioPath":...,"text":...}`,
/// `{"status":"complete"}`, `{"status":"error","message":...}`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SynthesisEvent {
    Partial {
        #[serde(rename = "audioPath")]
        audio_path: String,
        text: String,
    },
    Complete,
    #[serde(rename = "error")]
    Failed { message: String },
}

/// Per-request synthesis driver
///
/// Holds the engine handle and the per-call timeout; one instance serves one
/// request at a time, and instances are cheap to create per connection.
pub struct SpeechPipeline {
    engine: Arc<dyn TtsEngine>,
    engine_timeout: Duration,
}

impl SpeechPipeline {
    pub fn new(engine: Arc<dyn TtsEngine>, engine_timeout: Duration) -> Self {
        Self {
            engine,
            engine_timeout,
        }
    }

    /// Process one synthesis request, emitting events on `events`
    ///
    /// Empty or whitespace-only text is a deliberate no-op: no events are
    /// emitted. The cancellation token is checked between units; an engine
    /// call already in flight runs to completion and its result is dropped
    /// with the rest of the request. A closed events channel counts as
    /// cancellation (the connection is gone, nobody is listening).
    pub async fn run(
        &self,
        text: &str,
        cancel: &CancellationToken,
        events: &mpsc::Sender<SynthesisEvent>,
    ) {
        if text.trim().is_empty() {
            return;
        }

        let units = split_sentences(text);
        debug!("synthesis request segmented into {} units", units.len());

        for unit in units {
            if cancel.is_cancelled() {
                debug!("synthesis request abandoned: connection cancelled");
                return;
            }

            let stem = artifact_stem();
            let result = timeout(self.engine_timeout, self.engine.synthesize(&unit, &stem)).await;

            match result {
                Ok(Ok(path)) => {
                    info!("generated audio for sentence: {unit} at: {}", path.display());
                    let event = SynthesisEvent::Partial {
                        audio_path: path.to_string_lossy().into_owned(),
                        text: unit,
                    };
                    if events.send(event).await.is_err() {
                        return;
                    }
                }
                Ok(Err(e)) => {
                    warn!("synthesis failed for sentence: {unit}: {e}");
                    let _ = events
                        .send(SynthesisEvent::Failed {
                            message: e.to_string(),
                        })
                        .await;
                    return;
                }
                Err(_) => {
                    warn!("synthesis timed out for sentence: {unit}");
                    let _ = events
                        .send(SynthesisEvent::Failed {
                            message: format!(
                                "synthesis timed out after {}s",
                                self.engine_timeout.as_secs()
                            ),
                        })
                        .await;
                    return;
                }
            }
        }

        let _ = events.send(SynthesisEvent::Complete).await;
    }
}

/// Unique artifact name: current time plus a short random suffix
///
/// Uniqueness across concurrent sessions comes from the UUID part; the
/// timestamp keeps the shared artifact store browsable.
fn artifact_stem() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}_{}", Utc::now().format("%Y%m%d_%H%M%S"), &suffix[..8])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tts::{TtsError, TtsResult};
    use async_trait::async_trait;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Engine that succeeds until `fail_from` calls have been made
    struct ScriptedEngine {
        calls: AtomicUsize,
        fail_from: usize,
    }

    impl ScriptedEngine {
        fn ok() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_from: usize::MAX,
            }
        }

        fn failing_from(fail_from: usize) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_from,
            }
        }
    }

    #[async_trait]
    impl TtsEngine for ScriptedEngine {
        async fn synthesize(&self, text: &str, file_stem: &str) -> TtsResult<PathBuf> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call >= self.fail_from {
                return Err(TtsError::Provider(format!("engine rejected: {text}")));
            }
            Ok(PathBuf::from(format!("cache/{file_stem}.mp3")))
        }
    }

    async fn collect(engine: Arc<dyn TtsEngine>, text: &str) -> Vec<SynthesisEvent> {
        let pipeline = SpeechPipeline::new(engine, Duration::from_secs(5));
        let (tx, mut rx) = mpsc::channel(16);
        let cancel = CancellationToken::new();
        pipeline.run(text, &cancel, &tx).await;
        drop(tx);

        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn emits_ordered_partials_then_complete() {
        let events = collect(Arc::new(ScriptedEngine::ok()), "Hello world. How are you.").await;

        assert_eq!(events.len(), 3);
        match &events[0] {
            SynthesisEvent::Partial { text, audio_path } => {
                assert_eq!(text, "Hello world.");
                assert!(audio_path.ends_with(".mp3"));
            }
            other => panic!("expected partial, got {other:?}"),
        }
        match &events[1] {
            SynthesisEvent::Partial { text, .. } => assert_eq!(text, "How are you."),
            other => panic!("expected partial, got {other:?}"),
        }
        assert_eq!(events[2], SynthesisEvent::Complete);
    }

    #[tokio::test]
    async fn empty_text_emits_nothing() {
        assert!(collect(Arc::new(ScriptedEngine::ok()), "").await.is_empty());
        assert!(collect(Arc::new(ScriptedEngine::ok()), "   \n ").await.is_empty());
    }

    #[tokio::test]
    async fn failure_stops_after_first_partial() {
        let events = collect(
            Arc::new(ScriptedEngine::failing_from(1)),
            "First one. Second one. Third one.",
        )
        .await;

        assert_eq!(events.len(), 2);
        assert!(matches!(&events[0], SynthesisEvent::Partial { text, .. } if text == "First one."));
        assert!(matches!(&events[1], SynthesisEvent::Failed { message } if message.contains("Second one.")));
    }

    #[tokio::test]
    async fn cancellation_between_units_stops_quietly() {
        let pipeline = SpeechPipeline::new(Arc::new(ScriptedEngine::ok()), Duration::from_secs(5));
        let (tx, mut rx) = mpsc::channel(16);
        let cancel = CancellationToken::new();
        cancel.cancel();

        pipeline.run("One. Two.", &cancel, &tx).await;
        drop(tx);
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn slow_engine_reports_timeout() {
        struct SlowEngine;

        #[async_trait]
        impl TtsEngine for SlowEngine {
            async fn synthesize(&self, _text: &str, file_stem: &str) -> TtsResult<PathBuf> {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(PathBuf::from(file_stem))
            }
        }

        let pipeline = SpeechPipeline::new(Arc::new(SlowEngine), Duration::from_millis(50));
        let (tx, mut rx) = mpsc::channel(16);
        let cancel = CancellationToken::new();
        pipeline.run("Hello.", &cancel, &tx).await;
        drop(tx);

        let event = rx.recv().await.unwrap();
        assert!(matches!(event, SynthesisEvent::Failed { ref message } if message.contains("timed out")));
        assert!(rx.recv().await.is_none());
    }

    #[test]
    fn events_serialize_to_wire_format() {
        let partial = SynthesisEvent::Partial {
            audio_path: "cache/x.mp3".to_string(),
            text: "Hi.".to_string(),
        };
        let json = serde_json::to_value(&partial).unwrap();
        assert_eq!(json["status"], "partial");
        assert_eq!(json["audioPath"], "cache/x.mp3");

        let complete = serde_json::to_value(SynthesisEvent::Complete).unwrap();
        assert_eq!(complete["status"], "complete");

        let failed = serde_json::to_value(SynthesisEvent::Failed {
            message: "boom".to_string(),
        })
        .unwrap();
        assert_eq!(failed["status"], "error");
        assert_eq!(failed["message"], "boom");
    }
}

//! Wire message types for the primary session channel

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::pipeline::SynthesisEvent;

/// Messages accepted from the client
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    #[serde(rename = "text-input")]
    TextInput { text: String },
    #[serde(rename = "synthesize")]
    Synthesize { text: String },
    #[serde(rename = "interrupt")]
    Interrupt,
}

/// Messages sent to the client
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    #[serde(rename = "session-ready")]
    SessionReady { session_id: Uuid },
    #[serde(rename = "reply")]
    Reply { text: String },
    /// Synthesis event for a request made on this channel; the inner
    /// `status` tag rides alongside the outer `type` tag
    #[serde(rename = "synthesis")]
    Synthesis(SynthesisEvent),
    #[serde(rename = "interrupt-ack")]
    InterruptAck,
    #[serde(rename = "error")]
    Error { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_messages_parse_by_tag() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type": "text-input", "text": "hi"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::TextInput { text } if text == "hi"));

        let msg: ClientMessage = serde_json::from_str(r#"{"type": "interrupt"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::Interrupt));
    }

    #[test]
    fn synthesis_events_nest_under_type_tag() {
        let msg = ServerMessage::Synthesis(SynthesisEvent::Partial {
            audio_path: "cache/a.mp3".to_string(),
            text: "Hi.".to_string(),
        });
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "synthesis");
        assert_eq!(json["status"], "partial");
        assert_eq!(json["audioPath"], "cache/a.mp3");
    }

    #[test]
    fn unknown_type_is_rejected() {
        assert!(serde_json::from_str::<ClientMessage>(r#"{"type": "bogus"}"#).is_err());
    }
}

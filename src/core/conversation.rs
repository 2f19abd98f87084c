//! Conversation engine seam
//!
//! Turn-taking logic lives in an external backend; the gateway only routes
//! chat turns through this trait. `EchoConversation` is the built-in
//! stand-in used when no backend is wired in.

use async_trait::async_trait;
use uuid::Uuid;

/// Error types for conversation operations
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConversationError {
    #[error("Conversation backend error: {0}")]
    Backend(String),
}

/// Base trait for conversational backends
#[async_trait]
pub trait ConversationEngine: Send + Sync {
    /// Produce a reply for one user turn
    async fn respond(&self, session_id: Uuid, text: &str) -> Result<String, ConversationError>;

    /// Interrupt whatever the backend is doing for this session
    async fn interrupt(&self, _session_id: Uuid) {}
}

/// Trivial backend that replies with the user's own text
pub struct EchoConversation;

#[async_trait]
impl ConversationEngine for EchoConversation {
    async fn respond(&self, _session_id: Uuid, text: &str) -> Result<String, ConversationError> {
        Ok(text.to_string())
    }
}

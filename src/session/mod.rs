//! Session state and registry
//!
//! A `Session` is the server-side state of one client connection on the
//! primary channel. Its socket is exclusively owned by the dispatch task;
//! anything else that wants to reach the client goes through the session's
//! outbound channel. The registry is the only piece of state shared across
//! connections and uses per-entry locking so sessions never contend with
//! each other.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use uuid::Uuid;

use crate::config::ConfigSnapshot;
use crate::handlers::ws::messages::ServerMessage;

/// Error types for session registration
#[derive(Debug, Clone, thiserror::Error)]
pub enum SessionError {
    #[error("session registry is full ({0} active sessions)")]
    RegistryFull(usize),
}

/// Server-side state of one connected client
#[derive(Debug)]
pub struct Session {
    /// Server-assigned opaque identifier
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    /// Configuration captured when the session was accepted; later global
    /// updates do not reach a live session
    pub config: Arc<ConfigSnapshot>,
    outbound: mpsc::Sender<ServerMessage>,
    cancel: CancellationToken,
}

impl Session {
    /// Handle for routing messages to this session's socket
    pub fn outbound(&self) -> &mpsc::Sender<ServerMessage> {
        &self.outbound
    }

    /// Token cancelled exactly once, when the session is disconnected
    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

/// Process-wide map of live sessions
pub struct SessionRegistry {
    sessions: DashMap<Uuid, Arc<Session>>,
    capacity: usize,
}

impl SessionRegistry {
    pub fn new(capacity: usize) -> Self {
        Self {
            sessions: DashMap::new(),
            capacity,
        }
    }

    /// Register a new session with a fresh identifier
    ///
    /// The only failure mode is registry exhaustion, which is fatal for the
    /// connection being accepted and invisible to every other session.
    pub fn insert(
        &self,
        config: Arc<ConfigSnapshot>,
        outbound: mpsc::Sender<ServerMessage>,
    ) -> Result<Arc<Session>, SessionError> {
        let active = self.sessions.len();
        if active >= self.capacity {
            return Err(SessionError::RegistryFull(active));
        }

        let session = Arc::new(Session {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            config,
            outbound,
            cancel: CancellationToken::new(),
        });
        self.sessions.insert(session.id, session.clone());
        debug!(session_id = %session.id, "session registered ({} active)", self.sessions.len());
        Ok(session)
    }

    pub fn get(&self, id: Uuid) -> Option<Arc<Session>> {
        self.sessions.get(&id).map(|entry| entry.clone())
    }

    /// Remove a session and cancel its in-flight work
    ///
    /// Idempotent: the atomic removal is the single-entry guard, so a close
    /// event and an error path racing here still release exactly once.
    /// Returns whether this call performed the removal.
    pub fn disconnect(&self, id: Uuid) -> bool {
        match self.sessions.remove(&id) {
            Some((_, session)) => {
                session.cancel.cancel();
                debug!(session_id = %id, "session removed ({} active)", self.sessions.len());
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

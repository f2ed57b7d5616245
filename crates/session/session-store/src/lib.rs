//! # Session Store
//!
//! Holds one [`SessionState`] per conversation id between turns. The resolver never sees the
//! store: callers fetch a state before a turn and save the advanced state after it.
//!
//! Sessions inactive for longer than the timeout are dropped on every access.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use budtender_core::SessionState;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use tracing::info;

/// Default inactivity timeout in minutes.
pub const DEFAULT_SESSION_TIMEOUT_MINUTES: i64 = 30;

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns the session's state, creating an empty one if missing. Refreshes its activity.
    async fn get_or_create(&self, session_id: &str) -> SessionState;

    /// Replaces the session's state. Refreshes its activity.
    async fn save(&self, session_id: &str, state: SessionState);

    /// Removes a session; returns whether it existed.
    async fn remove(&self, session_id: &str) -> bool;

    /// Drops inactive sessions; returns how many were removed.
    async fn cleanup_expired(&self) -> usize;
}

#[derive(Debug, Clone)]
struct SessionEntry {
    state: SessionState,
    last_updated: DateTime<Utc>,
}

/// Process-local session store.
#[derive(Debug, Clone)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<String, SessionEntry>>>,
    timeout: Duration,
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new(Duration::minutes(DEFAULT_SESSION_TIMEOUT_MINUTES))
    }
}

impl InMemorySessionStore {
    pub fn new(timeout: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Drops sessions whose last activity is more than the timeout before `now`.
    pub async fn cleanup_expired_at(&self, now: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|session_id, entry| {
            let keep = now - entry.last_updated <= self.timeout;
            if !keep {
                info!(session_id = %session_id, "Removing expired session");
            }
            keep
        });
        before - sessions.len()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get_or_create(&self, session_id: &str) -> SessionState {
        let now = Utc::now();
        self.cleanup_expired_at(now).await;

        let mut sessions = self.sessions.write().await;
        let entry = sessions.entry(session_id.to_string()).or_insert_with(|| {
            info!(session_id, "Creating new session");
            SessionEntry {
                state: SessionState::new(),
                last_updated: now,
            }
        });
        entry.last_updated = now;
        entry.state.clone()
    }

    async fn save(&self, session_id: &str, state: SessionState) {
        let now = Utc::now();
        self.cleanup_expired_at(now).await;

        self.sessions.write().await.insert(
            session_id.to_string(),
            SessionEntry {
                state,
                last_updated: now,
            },
        );
    }

    async fn remove(&self, session_id: &str) -> bool {
        self.sessions.write().await.remove(session_id).is_some()
    }

    async fn cleanup_expired(&self) -> usize {
        self.cleanup_expired_at(Utc::now()).await
    }
}

//! Session store abstraction
//!
//! Keyed retrieval by session identifier with lazy expiry: `get` removes and
//! hides entries past their deadline, so no sweeper task exists anywhere.
//! The store is injected into the gate rather than held as a process-wide
//! singleton.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::session::errors::SessionError;
use crate::session::types::{SessionId, StoredSession};
use crate::utils::gen_random_string;

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Persist a new session under a freshly generated identifier.
    async fn create(&self, session: StoredSession) -> Result<SessionId, SessionError>;

    /// Look up a session. Expired entries are removed and reported as absent.
    async fn get(&self, id: &SessionId) -> Result<Option<StoredSession>, SessionError>;

    /// Replace the stored state of an existing session (CSRF re-issue).
    async fn update(&self, id: &SessionId, session: StoredSession) -> Result<(), SessionError>;

    async fn invalidate(&self, id: &SessionId) -> Result<(), SessionError>;
}

/// In-memory store. The single mutex serializes writers, so two concurrent
/// sign-ins for the same cookie cannot produce divergent sessions.
pub struct InMemorySessionStore {
    entries: Mutex<HashMap<String, String>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        tracing::info!("Creating new in-memory session store");
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

fn serialize(session: &StoredSession) -> Result<String, SessionError> {
    serde_json::to_string(session).map_err(|e| SessionError::Storage(e.to_string()))
}

fn deserialize(value: &str) -> Result<StoredSession, SessionError> {
    serde_json::from_str(value).map_err(|e| SessionError::Storage(e.to_string()))
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(&self, session: StoredSession) -> Result<SessionId, SessionError> {
        let id = SessionId::new(gen_random_string(32)?);
        let value = serialize(&session)?;
        self.entries
            .lock()
            .await
            .insert(id.as_str().to_string(), value);
        Ok(id)
    }

    async fn get(&self, id: &SessionId) -> Result<Option<StoredSession>, SessionError> {
        let mut entries = self.entries.lock().await;
        let Some(value) = entries.get(id.as_str()) else {
            return Ok(None);
        };
        let session = deserialize(value)?;
        if session.is_expired(Utc::now()) {
            tracing::debug!("Session {id} expired at {}", session.expires_at);
            entries.remove(id.as_str());
            return Ok(None);
        }
        Ok(Some(session))
    }

    async fn update(&self, id: &SessionId, session: StoredSession) -> Result<(), SessionError> {
        let value = serialize(&session)?;
        let mut entries = self.entries.lock().await;
        if !entries.contains_key(id.as_str()) {
            return Err(SessionError::Storage(
                "Cannot update a session that does not exist".to_string(),
            ));
        }
        entries.insert(id.as_str().to_string(), value);
        Ok(())
    }

    async fn invalidate(&self, id: &SessionId) -> Result<(), SessionError> {
        self.entries.lock().await.remove(id.as_str());
        Ok(())
    }
}

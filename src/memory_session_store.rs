use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use actix_session::storage::{LoadError, SaveError, SessionKey, SessionStore, UpdateError};
use actix_web::cookie::time::Duration;
use anyhow::anyhow;
use futures::FutureExt; // for .boxed()
use tokio::sync::Mutex;
use uuid::Uuid;

type SessionState = HashMap<String, String>;

struct SessionEntry {
    state: SessionState,
    expires_at: Instant,
}

impl SessionEntry {
    fn alive(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

/// In-memory session store. Sessions are ephemeral: they vanish on expiry or
/// process restart, which is exactly the divergence the session bridge
/// repairs by restoring the client-held grant.
#[derive(Clone)]
pub struct MemorySessionStore {
    sessions: Arc<Mutex<HashMap<String, SessionEntry>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        MemorySessionStore {
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(
        &self,
        session_key: &SessionKey,
    ) -> impl Future<Output = Result<Option<SessionState>, LoadError>> {
        let key = session_key.as_ref().to_owned();
        let sessions = Arc::clone(&self.sessions);
        async move {
            let mut sessions = sessions.lock().await;
            match sessions.get(&key) {
                Some(entry) if entry.alive() => Ok(Some(entry.state.clone())),
                Some(_) => {
                    // Expired entries are dropped on access.
                    sessions.remove(&key);
                    Ok(None)
                }
                None => Ok(None),
            }
        }
        .boxed()
    }

    fn save(
        &self,
        session_state: SessionState,
        ttl: &Duration,
    ) -> impl Future<Output = Result<SessionKey, SaveError>> {
        let ttl = *ttl;
        let sessions = Arc::clone(&self.sessions);
        async move {
            let key = Uuid::new_v4().to_string();
            let session_key = SessionKey::try_from(key.clone())
                .map_err(|e| SaveError::Other(anyhow!("Invalid session key: {}", e)))?;
            let entry = SessionEntry {
                state: session_state,
                expires_at: expiry_from(ttl),
            };
            sessions.lock().await.insert(key, entry);
            Ok(session_key)
        }
        .boxed()
    }

    fn update(
        &self,
        session_key: SessionKey,
        session_state: SessionState,
        ttl: &Duration,
    ) -> impl Future<Output = Result<SessionKey, UpdateError>> {
        let ttl = *ttl;
        let key = session_key.as_ref().to_owned();
        let sessions = Arc::clone(&self.sessions);
        async move {
            let entry = SessionEntry {
                state: session_state,
                expires_at: expiry_from(ttl),
            };
            sessions.lock().await.insert(key, entry);
            Ok(session_key)
        }
        .boxed()
    }

    fn update_ttl(
        &self,
        session_key: &SessionKey,
        ttl: &Duration,
    ) -> impl Future<Output = Result<(), anyhow::Error>> {
        let ttl = *ttl;
        let key = session_key.as_ref().to_owned();
        let sessions = Arc::clone(&self.sessions);
        async move {
            let mut sessions = sessions.lock().await;
            match sessions.get_mut(&key) {
                Some(entry) => {
                    entry.expires_at = expiry_from(ttl);
                    Ok(())
                }
                None => Err(anyhow!("Session not found")),
            }
        }
        .boxed()
    }

    fn delete(
        &self,
        session_key: &SessionKey,
    ) -> impl Future<Output = Result<(), anyhow::Error>> {
        let key = session_key.as_ref().to_owned();
        let sessions = Arc::clone(&self.sessions);
        async move {
            sessions.lock().await.remove(&key);
            Ok(())
        }
        .boxed()
    }
}

fn expiry_from(ttl: Duration) -> Instant {
    let seconds = ttl.whole_seconds().max(0) as u64;
    Instant::now() + std::time::Duration::from_secs(seconds)
}

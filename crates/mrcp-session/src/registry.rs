use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::debug;

use crate::session::{MrcpSession, SessionRole};

/// Process-wide table of live sessions, keyed by session id.
///
/// Each session is behind its own `Mutex` rather than one lock over the
/// whole table, so concurrent traffic on unrelated sessions never
/// contends.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: DashMap<String, Arc<Mutex<MrcpSession>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self, id: impl Into<String>, role: SessionRole) -> Arc<Mutex<MrcpSession>> {
        let id = id.into();
        let session = Arc::new(Mutex::new(MrcpSession::new(id.clone(), role)));
        debug!(session = %id, "session registered");
        self.sessions.insert(id, session.clone());
        session
    }

    pub fn get(&self, id: &str) -> Option<Arc<Mutex<MrcpSession>>> {
        self.sessions.get(id).map(|entry| entry.value().clone())
    }

    pub fn remove(&self, id: &str) -> Option<Arc<Mutex<MrcpSession>>> {
        debug!(session = %id, "session removed from registry");
        self.sessions.remove(id).map(|(_, session)| session)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Ids of sessions that are both marked terminated and hold no
    /// channels, the set a cleanup sweep is safe to drop.
    pub async fn terminated_session_ids(&self) -> Vec<String> {
        let mut ids = Vec::new();
        for entry in self.sessions.iter() {
            let session = entry.value().lock().await;
            if session.is_terminated() && session.is_empty() {
                ids.push(entry.key().clone());
            }
        }
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let registry = SessionRegistry::new();
        registry.create("sess1", SessionRole::Server);
        let session = registry.get("sess1").unwrap();
        assert_eq!(session.lock().await.id, "sess1");
    }

    #[tokio::test]
    async fn remove_drops_entry() {
        let registry = SessionRegistry::new();
        registry.create("sess1", SessionRole::Server);
        registry.remove("sess1");
        assert!(registry.get("sess1").is_none());
    }
}

//! In-memory session store implementation.

use crate::SessionStoreConfig;
use parking_lot::Mutex;
use slotwise_core::{ConversantId, DialogKind, Session};
use slotwise_error::{SessionError, SessionErrorKind, SessionResult};
use slotwise_interface::SessionStore;
use std::collections::HashMap;

/// Process-local session store.
///
/// Every operation runs under a single map lock, so [`SessionStore::update`]
/// is atomic. Sessions idle for longer than the configured TTL read as absent
/// and are dropped lazily or by [`InMemorySessionStore::purge_expired`]. When
/// the store is full, creating a session evicts the least recently active one.
///
/// # Example
///
/// ```
/// use slotwise_interface::SessionStore;
/// use slotwise_store::InMemorySessionStore;
///
/// let store = InMemorySessionStore::default();
/// let id = "chat-7".into();
///
/// store.create(&id, &"plan".into()).unwrap();
/// assert!(store.create(&id, &"plan".into()).is_err());
///
/// store.update(&id, |session| session.record("age", "25")).unwrap();
/// assert_eq!(*store.get(&id).unwrap().slot_index(), 1);
///
/// store.remove(&id);
/// store.remove(&id);
/// assert!(store.get(&id).is_none());
/// ```
#[derive(Debug)]
pub struct InMemorySessionStore {
    config: SessionStoreConfig,
    sessions: Mutex<HashMap<ConversantId, Session>>,
}

impl InMemorySessionStore {
    /// Create a store with configuration.
    pub fn new(config: SessionStoreConfig) -> Self {
        tracing::debug!(
            idle_ttl_secs = config.idle_ttl_secs(),
            max_sessions = config.max_sessions(),
            "Creating new InMemorySessionStore"
        );
        Self {
            config,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Store configuration.
    pub fn config(&self) -> &SessionStoreConfig {
        &self.config
    }

    /// Remove expired sessions, returning how many were dropped.
    pub fn purge_expired(&self) -> usize {
        let Some(ttl) = self.config.idle_ttl() else {
            return 0;
        };

        let mut sessions = self.sessions.lock();
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired(ttl));

        let removed = before - sessions.len();
        if removed > 0 {
            tracing::info!(
                removed,
                remaining = sessions.len(),
                "Purged expired sessions"
            );
        }
        removed
    }

    /// Number of stored sessions, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.sessions.lock().is_empty()
    }

    /// Drop the session for `id` if it has expired.
    fn drop_if_expired(&self, sessions: &mut HashMap<ConversantId, Session>, id: &ConversantId) {
        let Some(ttl) = self.config.idle_ttl() else {
            return;
        };
        if sessions.get(id).is_some_and(|s| s.is_expired(ttl)) {
            tracing::debug!(conversant = %id, "Session expired, removing");
            sessions.remove(id);
        }
    }

    /// Evict the least recently active session.
    fn evict_lru(sessions: &mut HashMap<ConversantId, Session>) {
        let oldest = sessions
            .iter()
            .min_by_key(|(_, session)| *session.last_activity())
            .map(|(id, _)| id.clone());

        if let Some(id) = oldest {
            tracing::warn!(conversant = %id, "Session store full, evicting least recently active session");
            sessions.remove(&id);
        }
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, id: &ConversantId) -> Option<Session> {
        let sessions = self.sessions.lock();
        let session = sessions.get(id)?;
        match self.config.idle_ttl() {
            Some(ttl) if session.is_expired(ttl) => None,
            _ => Some(session.clone()),
        }
    }

    #[tracing::instrument(skip(self), fields(conversant = %id, dialog = %kind))]
    fn create(&self, id: &ConversantId, kind: &DialogKind) -> SessionResult<Session> {
        let mut sessions = self.sessions.lock();
        self.drop_if_expired(&mut sessions, id);

        if sessions.contains_key(id) {
            tracing::debug!("Session already active");
            return Err(SessionError::new(SessionErrorKind::AlreadyActive(
                id.to_string(),
            )));
        }

        if sessions.len() >= *self.config.max_sessions() {
            if let Some(ttl) = self.config.idle_ttl() {
                sessions.retain(|_, session| !session.is_expired(ttl));
            }
            if sessions.len() >= *self.config.max_sessions() {
                Self::evict_lru(&mut sessions);
            }
        }

        let session = Session::new(id.clone(), kind.clone());
        sessions.insert(id.clone(), session.clone());
        tracing::debug!(active = sessions.len(), "Session created");
        Ok(session)
    }

    fn update<R, F>(&self, id: &ConversantId, mutator: F) -> SessionResult<R>
    where
        F: FnOnce(&mut Session) -> R,
    {
        let mut sessions = self.sessions.lock();
        self.drop_if_expired(&mut sessions, id);

        let session = sessions
            .get_mut(id)
            .ok_or_else(|| SessionError::new(SessionErrorKind::NotFound(id.to_string())))?;
        Ok(mutator(session))
    }

    fn remove(&self, id: &ConversantId) -> Option<Session> {
        let removed = self.sessions.lock().remove(id);
        if removed.is_some() {
            tracing::debug!(conversant = %id, "Session removed");
        }
        removed
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new(SessionStoreConfig::default())
    }
}

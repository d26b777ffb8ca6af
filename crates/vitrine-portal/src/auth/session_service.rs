//! Session Store
//!
//! Server-held sessions keyed by opaque token. Sessions are created on
//! login, destroyed on logout, and lazily dropped once expired. The map is
//! shared across request handlers; reads dominate writes.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use rand::RngCore;

/// Default session lifetime: 8 hours
pub const DEFAULT_SESSION_TTL_SECS: i64 = 28800;

/// An authenticated session bound to a user
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: String,
    pub username: String,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

/// Concurrent token -> session map
pub struct SessionStore {
    sessions: DashMap<String, Session>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl_secs: i64) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl: Duration::seconds(ttl_secs),
        }
    }

    /// Create a session for the given user and hand back its opaque token.
    pub fn create(&self, user_id: impl Into<String>, username: impl Into<String>) -> String {
        let token = generate_token();
        let session = Session {
            user_id: user_id.into(),
            username: username.into(),
            expires_at: Utc::now() + self.ttl,
        };
        self.sessions.insert(token.clone(), session);
        token
    }

    /// Resolve a token to its session. Expired entries are removed on the
    /// way out.
    pub fn resolve(&self, token: &str) -> Option<Session> {
        let session = self.sessions.get(token)?.clone();
        if session.is_expired() {
            self.sessions.remove(token);
            return None;
        }
        Some(session)
    }

    /// Invalidate a session token. Unknown tokens are ignored.
    pub fn revoke(&self, token: &str) {
        self.sessions.remove(token);
    }

    /// Drop every expired session. Callers may run this periodically; the
    /// store stays correct without it because resolve() checks expiry.
    pub fn purge_expired(&self) {
        self.sessions.retain(|_, session| !session.is_expired());
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_TTL_SECS)
    }
}

/// 32 random bytes, base64-url encoded without padding.
fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    base64::Engine::encode(&base64::engine::general_purpose::URL_SAFE_NO_PAD, bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_resolve() {
        let store = SessionStore::default();
        let token = store.create("user-1", "alice");

        let session = store.resolve(&token).unwrap();
        assert_eq!(session.user_id, "user-1");
        assert_eq!(session.username, "alice");
    }

    #[test]
    fn test_unknown_token_resolves_to_none() {
        let store = SessionStore::default();
        assert!(store.resolve("not-a-token").is_none());
    }

    #[test]
    fn test_revoke_invalidates() {
        let store = SessionStore::default();
        let token = store.create("user-1", "alice");

        store.revoke(&token);
        assert!(store.resolve(&token).is_none());
    }

    #[test]
    fn test_expired_session_is_dropped() {
        let store = SessionStore::new(-1);
        let token = store.create("user-1", "alice");

        assert!(store.resolve(&token).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_purge_expired() {
        let expired = SessionStore::new(-1);
        expired.create("user-1", "alice");
        expired.purge_expired();
        assert!(expired.is_empty());

        let live = SessionStore::default();
        live.create("user-2", "bob");
        live.purge_expired();
        assert_eq!(live.len(), 1);
    }

    #[test]
    fn test_tokens_are_unique_and_opaque() {
        let store = SessionStore::default();
        let a = store.create("user-1", "alice");
        let b = store.create("user-1", "alice");

        assert_ne!(a, b);
        assert!(a.len() >= 40);
        assert!(!a.contains("user-1"));
    }
}

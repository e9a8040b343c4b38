//! in-memory session store.
//!
//! sessions are created on login, read on every gated request and
//! destroyed on logout. each session is an opaque random token mapped
//! to the authenticated user; expiry is a fixed window from creation,
//! and expired entries are dropped lazily on lookup.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use docket_types::{Role, UserId};
use tokio::sync::RwLock;

/// the authenticated identity carried by a session.
#[derive(Debug, Clone)]
pub struct SessionUser {
    /// user id.
    pub id: UserId,
    /// username at login time.
    pub username: String,
    /// role at login time.
    pub role: Role,
}

#[derive(Debug, Clone)]
struct Session {
    user: SessionUser,
    expires_at: DateTime<Utc>,
}

/// process-wide session store keyed by opaque tokens.
#[derive(Clone)]
pub struct SessionStore {
    ttl: Duration,
    inner: Arc<RwLock<HashMap<String, Session>>>,
}

impl SessionStore {
    /// create a store with the given session lifetime.
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            ttl: Duration::seconds(ttl_secs as i64),
            inner: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// session lifetime in seconds, for the cookie max-age.
    pub fn ttl_secs(&self) -> i64 {
        self.ttl.num_seconds()
    }

    /// create a new session for the given user, returning its token.
    pub async fn create(&self, user: SessionUser) -> String {
        let token = generate_token();
        let session = Session {
            user,
            expires_at: Utc::now() + self.ttl,
        };
        self.inner.write().await.insert(token.clone(), session);
        token
    }

    /// look up a session, dropping it if expired.
    pub async fn get(&self, token: &str) -> Option<SessionUser> {
        let mut sessions = self.inner.write().await;
        match sessions.get(token) {
            Some(session) if session.expires_at > Utc::now() => Some(session.user.clone()),
            Some(_) => {
                sessions.remove(token);
                None
            }
            None => None,
        }
    }

    /// destroy a session server-side. subsequent requests bearing the
    /// old token are unauthenticated.
    pub async fn destroy(&self, token: &str) -> bool {
        self.inner.write().await.remove(token).is_some()
    }
}

/// generate a new random session token (32 bytes, hex).
fn generate_token() -> String {
    use rand::Rng;
    let mut rng = rand::rng();
    let bytes: [u8; 32] = rng.random();
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> SessionUser {
        SessionUser {
            id: UserId(1),
            username: "admin".to_string(),
            role: Role::Administrator,
        }
    }

    #[test]
    fn test_tokens_are_unique_and_opaque() {
        let a = generate_token();
        let b = generate_token();
        assert_eq!(a.len(), 64);
        assert_ne!(a, b);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[tokio::test]
    async fn test_create_get_destroy() {
        let store = SessionStore::new(3600);

        let token = store.create(test_user()).await;
        let user = store.get(&token).await.expect("session should exist");
        assert_eq!(user.username, "admin");
        assert_eq!(user.role, Role::Administrator);

        assert!(store.destroy(&token).await);
        assert!(store.get(&token).await.is_none());
        // destroying again is a no-op
        assert!(!store.destroy(&token).await);
    }

    #[tokio::test]
    async fn test_unknown_token() {
        let store = SessionStore::new(3600);
        assert!(store.get("deadbeef").await.is_none());
    }

    #[tokio::test]
    async fn test_expired_session_dropped() {
        let store = SessionStore::new(0);
        let token = store.create(test_user()).await;
        assert!(store.get(&token).await.is_none());
    }
}

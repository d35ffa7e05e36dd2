use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// A completed login: the principal's access token plus the provider-assigned
/// expiry. Written by the external protocol layer; this crate only reads it.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorizedSession {
    pub registration_id: String,
    pub principal_name: String,
    pub access_token: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl AuthorizedSession {
    pub fn new(
        registration_id: impl Into<String>,
        principal_name: impl Into<String>,
        access_token: impl Into<String>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            registration_id: registration_id.into(),
            principal_name: principal_name.into(),
            access_token: access_token.into(),
            expires_at,
        }
    }
}

// Keep the bearer token out of log output.
impl fmt::Debug for AuthorizedSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizedSession")
            .field("registration_id", &self.registration_id)
            .field("principal_name", &self.principal_name)
            .field("access_token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Concurrent store of authorized sessions, keyed by
/// `(registration_id, principal_name)`.
///
/// Raw storage only: last write for a key wins, no TTL, no eviction.
/// Lifecycle is owned by the external session layer; lookups tolerate
/// absence.
#[derive(Debug, Default)]
pub struct AuthorizedSessionStore {
    sessions: RwLock<HashMap<(String, String), AuthorizedSession>>,
}

impl AuthorizedSessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, session: AuthorizedSession) {
        let key = (
            session.registration_id.clone(),
            session.principal_name.clone(),
        );
        self.sessions.write().insert(key, session);
    }

    pub fn get(&self, registration_id: &str, principal_name: &str) -> Option<AuthorizedSession> {
        self.sessions
            .read()
            .get(&(registration_id.to_string(), principal_name.to_string()))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;

    #[test]
    fn get_of_absent_key_is_none() {
        let store = AuthorizedSessionStore::new();

        assert_eq!(store.get("podproxy", "nobody@example.com"), None);
    }

    #[test]
    fn last_write_wins_for_a_key() {
        let store = AuthorizedSessionStore::new();
        store.put(AuthorizedSession::new(
            "podproxy",
            "user@example.com",
            "token-1",
            None,
        ));
        store.put(AuthorizedSession::new(
            "podproxy",
            "user@example.com",
            "token-2",
            None,
        ));

        let session = store.get("podproxy", "user@example.com").unwrap();
        assert_eq!(session.access_token, "token-2");
    }

    #[test]
    fn keys_are_scoped_by_registration_id() {
        let store = AuthorizedSessionStore::new();
        store.put(AuthorizedSession::new(
            "podproxy",
            "user@example.com",
            "token",
            None,
        ));

        assert!(store.get("other", "user@example.com").is_none());
    }

    #[test]
    fn concurrent_puts_and_gets_keep_entries_intact() {
        let store = Arc::new(AuthorizedSessionStore::new());

        let writers: Vec<_> = (0..8)
            .map(|w| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for i in 0..100 {
                        let name = format!("user-{}@example.com", i % 10);
                        store.put(AuthorizedSession::new(
                            "podproxy",
                            name,
                            format!("token-{w}-{i}"),
                            None,
                        ));
                    }
                })
            })
            .collect();

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for i in 0..100 {
                        let name = format!("user-{}@example.com", i % 10);
                        if let Some(session) = store.get("podproxy", &name) {
                            // An observed entry is always a complete write.
                            assert_eq!(session.principal_name, name);
                            assert!(session.access_token.starts_with("token-"));
                        }
                    }
                })
            })
            .collect();

        for handle in writers.into_iter().chain(readers) {
            handle.join().unwrap();
        }

        for i in 0..10 {
            let name = format!("user-{i}@example.com");
            assert!(store.get("podproxy", &name).is_some());
        }
    }
}

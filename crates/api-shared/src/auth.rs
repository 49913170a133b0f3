//! Bearer-token sessions.
//!
//! A successful login issues a random token that maps to the user id until logout or until
//! the session lifetime runs out. Sessions live in memory only; restarting the server logs
//! everybody out. Expired entries are dropped whenever a session is created or resolved.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use triage_core::UserId;

#[derive(Clone, Copy, Debug)]
struct Session {
    user: UserId,
    issued_at: DateTime<Utc>,
}

/// Shared, cloneable map of active session tokens.
#[derive(Clone, Debug)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    ttl: Duration,
}

impl SessionStore {
    /// Creates an empty store whose sessions last `ttl_secs` seconds.
    pub fn new(ttl_secs: u32) -> Self {
        Self {
            sessions: Arc::default(),
            ttl: Duration::seconds(i64::from(ttl_secs)),
        }
    }

    /// Opens a session for `user` and returns its token.
    pub fn create(&self, user: UserId) -> String {
        self.create_at(user, Utc::now())
    }

    /// Returns the user of an active, unexpired session.
    pub fn resolve(&self, token: &str) -> Option<UserId> {
        self.resolve_at(token, Utc::now())
    }

    /// Ends a session. Returns false if the token was not active.
    pub fn revoke(&self, token: &str) -> bool {
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(token)
            .is_some()
    }

    /// Number of sessions currently held, expired or not.
    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_expired(&self, session: &Session, now: DateTime<Utc>) -> bool {
        now - session.issued_at >= self.ttl
    }

    fn create_at(&self, user: UserId, now: DateTime<Utc>) -> String {
        let token = uuid::Uuid::new_v4().simple().to_string();
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        sessions.retain(|_, session| !self.is_expired(session, now));
        sessions.insert(
            token.clone(),
            Session {
                user,
                issued_at: now,
            },
        );
        token
    }

    fn resolve_at(&self, token: &str, now: DateTime<Utc>) -> Option<UserId> {
        let session = self
            .sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(token)
            .copied()?;

        if self.is_expired(&session, now) {
            self.revoke(token);
            return None;
        }
        Some(session.user)
    }
}

/// Extracts the token from an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header_value: &str) -> Option<&str> {
    header_value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

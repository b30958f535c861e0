// src/auth/session.rs - signed-in actors by session token
use super::{Actor, AuthError, AuthResult};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::RwLock;

pub type SessionToken = String;

const DEFAULT_IDLE_TTL_MINUTES: i64 = 720;

#[derive(Debug, Clone)]
struct Session {
    actor: Actor,
    last_seen: DateTime<Utc>,
}

impl Session {
    fn is_stale(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.last_seen > ttl
            || self
                .actor
                .credential
                .as_ref()
                .is_some_and(|c| c.is_expired(now))
    }
}

/// Sessions begin at sign-in and end at sign-out, after `ttl` without a
/// request, or once the provider credential they carry has expired.
#[derive(Debug)]
pub struct SessionStore {
    sessions: RwLock<HashMap<SessionToken, Session>>,
    ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_ttl(Duration::minutes(DEFAULT_IDLE_TTL_MINUTES))
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub fn begin(&self, actor: Actor) -> SessionToken {
        self.begin_at(actor, Utc::now())
    }

    fn begin_at(&self, actor: Actor, now: DateTime<Utc>) -> SessionToken {
        let token = uuid::Uuid::new_v4().simple().to_string();
        log::info!("Session started for {}", actor.email);
        let mut sessions = self.sessions.write().unwrap_or_else(|p| p.into_inner());
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_stale(now, self.ttl));
        if sessions.len() < before {
            log::debug!("Pruned {} expired sessions", before - sessions.len());
        }
        sessions.insert(
            token.clone(),
            Session {
                actor,
                last_seen: now,
            },
        );
        token
    }

    /// Resolves a token and marks the session as used.
    pub fn actor(&self, token: &str) -> Option<Actor> {
        self.actor_at(token, Utc::now())
    }

    fn actor_at(&self, token: &str, now: DateTime<Utc>) -> Option<Actor> {
        let mut sessions = self.sessions.write().unwrap_or_else(|p| p.into_inner());
        let session = sessions.get_mut(token)?;
        if session.is_stale(now, self.ttl) {
            log::info!("Session expired for {}", session.actor.email);
            sessions.remove(token);
            return None;
        }
        session.last_seen = now;
        Some(session.actor.clone())
    }

    pub fn end(&self, token: &str) -> AuthResult<Actor> {
        let session = self
            .sessions
            .write()
            .unwrap_or_else(|p| p.into_inner())
            .remove(token)
            .ok_or(AuthError::SessionExpired)?;
        log::info!("Session ended for {}", session.actor.email);
        Ok(session.actor)
    }

    pub fn active_count(&self) -> usize {
        self.sessions.read().unwrap_or_else(|p| p.into_inner()).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Credential;

    fn actor() -> Actor {
        Actor::new("u1", "ali@gmail.com", None)
    }

    #[test]
    fn test_session_lifecycle() {
        let sessions = SessionStore::new();
        let token = sessions.begin(actor());
        assert_eq!(sessions.actor(&token), Some(actor()));
        assert_eq!(sessions.active_count(), 1);

        assert_eq!(sessions.end(&token), Ok(actor()));
        assert_eq!(sessions.actor(&token), None);
        assert_eq!(sessions.end(&token), Err(AuthError::SessionExpired));
    }

    #[test]
    fn test_tokens_are_unique() {
        let sessions = SessionStore::new();
        let a = sessions.begin(actor());
        let b = sessions.begin(actor());
        assert_ne!(a, b);
        assert_eq!(sessions.active_count(), 2);
    }

    #[test]
    fn test_idle_session_expires() {
        let sessions = SessionStore::with_ttl(Duration::minutes(30));
        let start = Utc::now();
        let token = sessions.begin_at(actor(), start);

        let later = start + Duration::minutes(20);
        assert_eq!(sessions.actor_at(&token, later), Some(actor()));
        // Activity slides the window forward.
        assert!(sessions.actor_at(&token, later + Duration::minutes(20)).is_some());

        assert_eq!(sessions.actor_at(&token, later + Duration::minutes(51)), None);
        assert_eq!(sessions.active_count(), 0);
        assert_eq!(sessions.end(&token), Err(AuthError::SessionExpired));
    }

    #[test]
    fn test_begin_prunes_stale_sessions() {
        let sessions = SessionStore::with_ttl(Duration::minutes(10));
        let start = Utc::now();
        let old = sessions.begin_at(actor(), start);
        let fresh = sessions.begin_at(actor(), start + Duration::minutes(11));
        assert_eq!(sessions.active_count(), 1);
        assert!(sessions.actor_at(&old, start + Duration::minutes(11)).is_none());
        assert!(sessions.actor_at(&fresh, start + Duration::minutes(12)).is_some());
    }

    #[test]
    fn test_expired_credential_ends_session() {
        let sessions = SessionStore::new();
        let start = Utc::now();
        let mut signed_in = actor();
        signed_in.credential = Some(Credential::new(
            "id-token",
            Some(start + Duration::minutes(60)),
        ));
        let token = sessions.begin_at(signed_in, start);

        assert!(sessions.actor_at(&token, start + Duration::minutes(59)).is_some());
        assert!(sessions.actor_at(&token, start + Duration::minutes(61)).is_none());
        assert_eq!(sessions.active_count(), 0);
    }
}

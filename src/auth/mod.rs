// =====================================================
// FILE: src/auth/mod.rs - AUTHENTICATION COLLABORATOR
// =====================================================

pub mod firebase;
pub mod local;
pub mod session;

pub use firebase::FirebaseAuth;
pub use local::LocalAuth;
pub use session::{SessionStore, SessionToken};

use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

/// A bearer token the auth provider issued at sign-in, presented to
/// backends whose access rules check the caller.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    token: String,
    expires_at: Option<DateTime<Utc>>,
}

impl Credential {
    pub fn new(token: impl Into<String>, expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            token: token.into(),
            expires_at,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"***")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// The signed-in identity. Its presence is the only authorization signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: String,
    pub display_name: Option<String>,
    pub email: String,
    /// Never serialized; `/api/auth/me` must not echo it.
    #[serde(skip)]
    pub credential: Option<Credential>,
}

impl Actor {
    pub fn new(id: impl Into<String>, email: impl Into<String>, display_name: Option<String>) -> Self {
        Self {
            id: id.into(),
            display_name,
            email: email.into(),
            credential: None,
        }
    }

    /// Name stamped on records this actor writes.
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.email)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    InvalidCredentials,
    SessionExpired,
    Provider(String),
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCredentials => write!(f, "invalid email or password"),
            Self::SessionExpired => write!(f, "session expired or unknown"),
            Self::Provider(msg) => write!(f, "auth provider error: {}", msg),
        }
    }
}

impl std::error::Error for AuthError {}

pub type AuthResult<T> = std::result::Result<T, AuthError>;

/// Email/password sign-in.
pub trait AuthProvider: Send + Sync {
    fn name(&self) -> &'static str;

    fn sign_in<'a>(&'a self, email: &'a str, password: &'a str)
        -> BoxFuture<'a, AuthResult<Actor>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_prefers_display_name() {
        let mut actor = Actor::new("u1", "ali@example.com", Some("Ali".into()));
        assert_eq!(actor.label(), "Ali");

        actor.display_name = Some(String::new());
        assert_eq!(actor.label(), "ali@example.com");

        actor.display_name = None;
        assert_eq!(actor.label(), "ali@example.com");
    }

    #[test]
    fn test_credential_stays_private() {
        let mut actor = Actor::new("u1", "ali@example.com", None);
        actor.credential = Some(Credential::new("id-token-xyz", None));

        let json = serde_json::to_string(&actor).unwrap();
        assert!(!json.contains("id-token-xyz"));
        assert!(!format!("{:?}", actor).contains("id-token-xyz"));
    }

    #[test]
    fn test_credential_expiry() {
        let now = Utc::now();
        assert!(!Credential::new("t", None).is_expired(now));
        assert!(Credential::new("t", Some(now)).is_expired(now));
        assert!(!Credential::new("t", Some(now + chrono::Duration::minutes(5))).is_expired(now));
    }
}

// src/auth/firebase.rs - Identity Toolkit email/password sign-in
use super::{Actor, AuthError, AuthProvider, AuthResult, Credential};
use chrono::{DateTime, Duration, Utc};
use futures::future::BoxFuture;
use futures::FutureExt;
use serde::Deserialize;
use serde_json::{json, Value};

const SIGN_IN_URL: &str = "https://identitytoolkit.googleapis.com/v1/accounts:signInWithPassword";

const CREDENTIAL_ERRORS: &[&str] = &[
    "EMAIL_NOT_FOUND",
    "INVALID_PASSWORD",
    "INVALID_LOGIN_CREDENTIALS",
    "INVALID_EMAIL",
    "USER_DISABLED",
];

pub struct FirebaseAuth {
    client: reqwest::Client,
    api_key: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    local_id: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    id_token: String,
    /// Seconds, sent as a string.
    #[serde(default)]
    expires_in: String,
}

impl SignInResponse {
    fn into_actor(self, typed_email: &str, now: DateTime<Utc>) -> Actor {
        let email = if self.email.is_empty() {
            typed_email.trim().to_string()
        } else {
            self.email
        };
        let mut actor = Actor::new(
            self.local_id,
            email,
            self.display_name.filter(|n| !n.is_empty()),
        );
        if !self.id_token.is_empty() {
            let expires_at = self
                .expires_in
                .trim()
                .parse::<i64>()
                .ok()
                .map(|secs| now + Duration::seconds(secs));
            actor.credential = Some(Credential::new(self.id_token, expires_at));
        }
        actor
    }
}

impl FirebaseAuth {
    pub fn new(api_key: impl Into<String>) -> AuthResult<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(AuthError::Provider(
                "auth.api_key is required for the firebase provider".to_string(),
            ));
        }
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(|e| AuthError::Provider(e.to_string()))?;
        Ok(Self { client, api_key })
    }

    async fn request(&self, email: &str, password: &str) -> AuthResult<Actor> {
        let response = self
            .client
            .post(SIGN_IN_URL)
            .query(&[("key", self.api_key.as_str())])
            .json(&json!({
                "email": email.trim(),
                "password": password,
                "returnSecureToken": true
            }))
            .send()
            .await
            .map_err(|e| AuthError::Provider(e.to_string()))?;

        if !response.status().is_success() {
            let body: Value = response.json().await.unwrap_or_default();
            let code = body["error"]["message"].as_str().unwrap_or("UNKNOWN");
            return Err(classify_error(code));
        }

        let signed_in: SignInResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Provider(e.to_string()))?;

        Ok(signed_in.into_actor(email, Utc::now()))
    }
}

/// Identity Toolkit reports e.g. `INVALID_PASSWORD` or
/// `TOO_MANY_ATTEMPTS_TRY_LATER : Access disabled ...`.
fn classify_error(message: &str) -> AuthError {
    let code = message.split(':').next().unwrap_or(message).trim();
    if CREDENTIAL_ERRORS.contains(&code) {
        AuthError::InvalidCredentials
    } else {
        AuthError::Provider(message.to_string())
    }
}

impl AuthProvider for FirebaseAuth {
    fn name(&self) -> &'static str {
        "firebase"
    }

    fn sign_in<'a>(
        &'a self,
        email: &'a str,
        password: &'a str,
    ) -> BoxFuture<'a, AuthResult<Actor>> {
        self.request(email, password).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_error() {
        assert_eq!(classify_error("INVALID_PASSWORD"), AuthError::InvalidCredentials);
        assert_eq!(
            classify_error("INVALID_LOGIN_CREDENTIALS"),
            AuthError::InvalidCredentials
        );
        assert!(matches!(
            classify_error("TOO_MANY_ATTEMPTS_TRY_LATER : Access disabled"),
            AuthError::Provider(_)
        ));
    }

    #[test]
    fn test_sign_in_keeps_id_token() {
        let body = serde_json::json!({
            "localId": "uid-7",
            "email": "",
            "displayName": "",
            "idToken": "eyJhbGciOi",
            "refreshToken": "r",
            "expiresIn": "3600"
        });
        let now = Utc::now();
        let response: SignInResponse = serde_json::from_value(body).unwrap();
        let actor = response.into_actor(" ali@example.com ", now);

        assert_eq!(actor.id, "uid-7");
        assert_eq!(actor.email, "ali@example.com");
        assert_eq!(actor.display_name, None);
        let credential = actor.credential.unwrap();
        assert_eq!(credential.token(), "eyJhbGciOi");
        assert!(!credential.is_expired(now + Duration::seconds(3599)));
        assert!(credential.is_expired(now + Duration::seconds(3600)));
    }

    #[test]
    fn test_requires_api_key() {
        assert!(FirebaseAuth::new("").is_err());
    }
}

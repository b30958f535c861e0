// src/server/extract.rs - who is making this request
use super::AppState;
use crate::auth::Actor;
use crate::core::constants::SESSION_COOKIE;
use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use futures::future::{ready, Ready};

/// The signed-in actor, if the request carries a live session token.
#[derive(Debug, Clone, Default)]
pub struct CurrentActor(pub Option<Actor>);

impl CurrentActor {
    pub fn into_inner(self) -> Option<Actor> {
        self.0
    }
}

impl FromRequest for CurrentActor {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let actor = req
            .app_data::<web::Data<AppState>>()
            .zip(session_token(req))
            .and_then(|(state, token)| state.sessions.actor(&token));
        ready(Ok(CurrentActor(actor)))
    }
}

/// `Authorization: Bearer <token>` first, then the session cookie.
pub fn session_token(req: &HttpRequest) -> Option<String> {
    let bearer = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from);

    bearer.or_else(|| {
        req.cookie(SESSION_COOKIE)
            .map(|c| c.value().to_string())
            .filter(|t| !t.is_empty())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::cookie::Cookie;
    use actix_web::test::TestRequest;

    #[test]
    fn test_bearer_wins_over_cookie() {
        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Bearer abc"))
            .cookie(Cookie::new(SESSION_COOKIE, "xyz"))
            .to_http_request();
        assert_eq!(session_token(&req).as_deref(), Some("abc"));
    }

    #[test]
    fn test_cookie_token() {
        let req = TestRequest::default()
            .cookie(Cookie::new(SESSION_COOKIE, "xyz"))
            .to_http_request();
        assert_eq!(session_token(&req).as_deref(), Some("xyz"));
    }

    #[test]
    fn test_no_token() {
        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Basic Zm9vOmJhcg=="))
            .to_http_request();
        assert_eq!(session_token(&req), None);
    }
}

// src/server/handlers/auth.rs - sign-in / sign-out
use super::HandlerResult;
use crate::auth::{Actor, AuthError};
use crate::core::constants::SESSION_COOKIE;
use crate::core::error::AppError;
use crate::server::extract::session_token;
use crate::server::{AppState, CurrentActor};
use actix_web::cookie::{Cookie, SameSite};
use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

pub(crate) fn session_cookie(token: &str) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token.to_string())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .finish()
}

pub(crate) fn expired_cookie() -> Cookie<'static> {
    let mut cookie = session_cookie("");
    cookie.make_removal();
    cookie
}

/// Checks credentials with the configured provider and opens a session.
pub(crate) async fn open_session(
    state: &AppState,
    credentials: &Credentials,
) -> Result<(String, Actor), AppError> {
    let actor = state
        .auth
        .sign_in(&credentials.email, &credentials.password)
        .await?;
    let token = state.sessions.begin(actor.clone());
    Ok((token, actor))
}

pub async fn login(state: web::Data<AppState>, credentials: web::Json<Credentials>) -> HandlerResult {
    let (token, actor) = open_session(&state, &credentials).await?;
    Ok(HttpResponse::Ok()
        .cookie(session_cookie(&token))
        .json(json!({ "token": token, "actor": actor })))
}

pub async fn logout(state: web::Data<AppState>, req: HttpRequest) -> HandlerResult {
    let token = session_token(&req).ok_or(AppError::Auth(AuthError::SessionExpired))?;
    let actor = state.sessions.end(&token)?;
    Ok(HttpResponse::Ok()
        .cookie(expired_cookie())
        .json(json!({ "signed_out": actor.email })))
}

pub async fn me(actor: CurrentActor) -> HandlerResult {
    match actor.into_inner() {
        Some(actor) => Ok(HttpResponse::Ok().json(actor)),
        None => Err(AppError::Auth(AuthError::SessionExpired)),
    }
}

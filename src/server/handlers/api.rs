// src/server/handlers/api.rs - JSON endpoints that are not content CRUD
use super::HandlerResult;
use crate::auth::AuthError;
use crate::content::{send_contact, ContactForm, ContentSection, Post, Project};
use crate::core::constants::VERSION;
use crate::core::error::AppError;
use crate::i18n::{self, switch_locale as switch_path, Locale};
use crate::server::{AppState, CurrentActor};
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

pub async fn health(state: web::Data<AppState>) -> HandlerResult {
    Ok(HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": crate::core::constants::PACKAGE_NAME,
        "version": VERSION,
        "store": state.store.name(),
        "auth": state.auth.name(),
        "uptime_seconds": state.started_at.elapsed().as_secs(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    })))
}

pub async fn locales() -> HandlerResult {
    let locales: Vec<_> = Locale::ALL
        .iter()
        .map(|l| {
            json!({
                "code": l.code(),
                "name": l.native_name(),
                "flag": l.flag(),
            })
        })
        .collect();

    Ok(HttpResponse::Ok().json(json!({
        "default": Locale::DEFAULT,
        "locales": locales,
    })))
}

#[derive(Debug, Deserialize)]
pub struct SwitchQuery {
    pub path: String,
    pub from: String,
    pub to: String,
}

pub async fn switch_locale(query: web::Query<SwitchQuery>) -> HandlerResult {
    let from = i18n::resolve(&query.from)?;
    let to = i18n::resolve(&query.to)?;
    Ok(HttpResponse::Ok().json(json!({ "path": switch_path(&query.path, from, to) })))
}

pub async fn contact(state: web::Data<AppState>, form: web::Json<ContactForm>) -> HandlerResult {
    let id = send_contact(state.store.as_ref(), form.into_inner()).await?;
    Ok(HttpResponse::Created().json(json!({ "id": id })))
}

/// Counts and view modes of both sections, for a signed-in actor.
pub async fn admin_stats(state: web::Data<AppState>, actor: CurrentActor) -> HandlerResult {
    let actor = actor
        .into_inner()
        .ok_or(AppError::Auth(AuthError::SessionExpired))?;

    let mut projects = ContentSection::<Project>::new(state.store.clone(), Some(actor.clone()));
    let mut posts = ContentSection::<Post>::new(state.store.clone(), Some(actor));
    let (project_outcome, post_outcome) = futures::join!(projects.load(), posts.load());

    Ok(HttpResponse::Ok().json(json!({
        "projects": {
            "count": project_outcome.records().len(),
            "mode": project_outcome.mode(),
        },
        "posts": {
            "count": post_outcome.records().len(),
            "mode": post_outcome.mode(),
        },
        "sessions": state.sessions.active_count(),
        "notices": projects.notices().iter().chain(posts.notices()).collect::<Vec<_>>(),
    })))
}

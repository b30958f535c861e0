// src/server/handlers/content.rs - /api/content/{kind}
use super::HandlerResult;
use crate::auth::Actor;
use crate::content::{
    ContentKind, ContentRecord, ContentSection, LoadOutcome, Notice, Post, Project, ViewMode,
    WriteOp,
};
use crate::core::error::AppError;
use crate::server::{AppState, CurrentActor};
use actix_web::{http::StatusCode, web, HttpResponse};
use serde::Serialize;
use serde_json::Value;

#[derive(Serialize)]
struct SectionBody<'a, R> {
    kind: ContentKind,
    mode: ViewMode,
    records: &'a [R],
    notices: &'a [Notice],
}

pub(super) fn parse_kind(slug: &str) -> Result<ContentKind, AppError> {
    ContentKind::from_slug(slug)
        .ok_or_else(|| AppError::NotFound(format!("Unknown content kind '{}'", slug)))
}

/// A body that does not decode is still answered by the sign-in and
/// demo-mode checks first.
pub(super) fn parse_form<R: ContentRecord>(
    section: &mut ContentSection<R>,
    op: WriteOp,
    body: Value,
) -> Result<R::Form, AppError> {
    match serde_json::from_value(body) {
        Ok(form) => Ok(form),
        Err(e) => {
            section.ensure_writable(op)?;
            Err(AppError::Validation(e.to_string()))
        }
    }
}

fn respond<R: ContentRecord>(
    status: StatusCode,
    section: &ContentSection<R>,
    outcome: &LoadOutcome<R>,
) -> HttpResponse {
    HttpResponse::build(status).json(SectionBody {
        kind: R::KIND,
        mode: outcome.mode(),
        records: outcome.records(),
        notices: section.notices(),
    })
}

/// Builds a section for a write. The list is only loaded when someone is
/// signed in, since an anonymous write is rejected before touching the store.
async fn writable<R: ContentRecord>(state: &AppState, actor: Option<Actor>) -> ContentSection<R> {
    let mut section = ContentSection::<R>::new(state.store.clone(), actor);
    if section.actor().is_some() {
        section.load().await;
    }
    section
}

async fn list_kind<R: ContentRecord>(state: &AppState, actor: Option<Actor>) -> HandlerResult {
    let mut section = ContentSection::<R>::new(state.store.clone(), actor);
    let outcome = section.load().await;
    Ok(respond(StatusCode::OK, &section, &outcome))
}

async fn create_kind<R: ContentRecord>(
    state: &AppState,
    actor: Option<Actor>,
    body: Value,
) -> HandlerResult {
    let mut section = writable::<R>(state, actor).await;
    let form = parse_form(&mut section, WriteOp::Create, body)?;
    let outcome = section.create(form).await?;
    Ok(respond(StatusCode::CREATED, &section, &outcome))
}

async fn update_kind<R: ContentRecord>(
    state: &AppState,
    actor: Option<Actor>,
    id: &str,
    body: Value,
) -> HandlerResult {
    let mut section = writable::<R>(state, actor).await;
    let form = parse_form(&mut section, WriteOp::Update, body)?;
    let outcome = section.update(id, form).await?;
    Ok(respond(StatusCode::OK, &section, &outcome))
}

async fn delete_kind<R: ContentRecord>(
    state: &AppState,
    actor: Option<Actor>,
    id: &str,
) -> HandlerResult {
    let mut section = writable::<R>(state, actor).await;
    let outcome = section.delete(id).await?;
    Ok(respond(StatusCode::OK, &section, &outcome))
}

pub async fn list(
    state: web::Data<AppState>,
    kind: web::Path<String>,
    actor: CurrentActor,
) -> HandlerResult {
    match parse_kind(&kind)? {
        ContentKind::Projects => list_kind::<Project>(&state, actor.into_inner()).await,
        ContentKind::Posts => list_kind::<Post>(&state, actor.into_inner()).await,
    }
}

pub async fn create(
    state: web::Data<AppState>,
    kind: web::Path<String>,
    actor: CurrentActor,
    body: web::Json<Value>,
) -> HandlerResult {
    let (actor, body) = (actor.into_inner(), body.into_inner());
    match parse_kind(&kind)? {
        ContentKind::Projects => create_kind::<Project>(&state, actor, body).await,
        ContentKind::Posts => create_kind::<Post>(&state, actor, body).await,
    }
}

pub async fn update(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    actor: CurrentActor,
    body: web::Json<Value>,
) -> HandlerResult {
    let (kind, id) = path.into_inner();
    let (actor, body) = (actor.into_inner(), body.into_inner());
    match parse_kind(&kind)? {
        ContentKind::Projects => update_kind::<Project>(&state, actor, &id, body).await,
        ContentKind::Posts => update_kind::<Post>(&state, actor, &id, body).await,
    }
}

pub async fn delete(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    actor: CurrentActor,
) -> HandlerResult {
    let (kind, id) = path.into_inner();
    match parse_kind(&kind)? {
        ContentKind::Projects => delete_kind::<Project>(&state, actor.into_inner(), &id).await,
        ContentKind::Posts => delete_kind::<Post>(&state, actor.into_inner(), &id).await,
    }
}

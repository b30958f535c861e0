// src/server/handlers/pages.rs - localized HTML pages
use super::auth::{expired_cookie, open_session, session_cookie, Credentials};
use super::content::{parse_form, parse_kind};
use super::{public_message, HandlerResult};
use crate::auth::Actor;
use crate::content::{
    send_contact, success_notice, ContactForm, ContentKind, ContentRecord, ContentSection,
    Notice, Post, Project, RejectReason, WriteOp, WriteRejected,
};
use crate::core::error::AppError;
use crate::i18n::{self, Locale};
use crate::server::extract::session_token;
use crate::server::render::{self, ContactStatus, Page};
use crate::server::{AppState, CurrentActor};
use actix_web::{http::header, web, HttpRequest, HttpResponse, ResponseError};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

fn html(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body)
}

fn see_other(location: String) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// `/` has no locale segment, so it goes to the default one.
pub async fn root() -> HttpResponse {
    HttpResponse::TemporaryRedirect()
        .insert_header((header::LOCATION, format!("/{}", Locale::DEFAULT.code())))
        .finish()
}

#[derive(Debug, Default, Deserialize)]
pub struct HomeQuery {
    contact: Option<String>,
}

pub async fn home(
    state: web::Data<AppState>,
    locale: web::Path<String>,
    query: web::Query<HomeQuery>,
    actor: CurrentActor,
    req: HttpRequest,
) -> HandlerResult {
    let locale = i18n::resolve(&locale)?;
    let actor = actor.into_inner();

    let mut projects = ContentSection::<Project>::new(state.store.clone(), actor.clone());
    let mut posts = ContentSection::<Post>::new(state.store.clone(), actor.clone());
    futures::join!(projects.load(), posts.load());

    let page = Page {
        locale,
        path: req.path(),
        site_title: &state.config.site_title,
        actor: actor.as_ref(),
    };
    let contact = ContactStatus::from_query(query.contact.as_deref());
    Ok(html(render::home(&page, &projects, &posts, contact)))
}

#[derive(Debug, Default, Deserialize)]
pub struct AdminQuery {
    /// `<kind>-<op>` of the write that redirected here.
    saved: Option<String>,
}

impl AdminQuery {
    fn flash(&self) -> Option<Notice> {
        let (kind, op) = self.saved.as_deref()?.split_once('-')?;
        Some(success_notice(
            ContentKind::from_slug(kind)?,
            WriteOp::from_slug(op)?,
        ))
    }
}

pub async fn admin(
    state: web::Data<AppState>,
    locale: web::Path<String>,
    query: web::Query<AdminQuery>,
    actor: CurrentActor,
    req: HttpRequest,
) -> HandlerResult {
    let locale = i18n::resolve(&locale)?;
    let actor = actor.into_inner();
    let page = Page {
        locale,
        path: req.path(),
        site_title: &state.config.site_title,
        actor: actor.as_ref(),
    };

    let Some(signed_in) = actor.as_ref() else {
        return Ok(html(render::sign_in(&page, None)));
    };

    Ok(html(dashboard(&state, &page, signed_in, query.flash().as_ref()).await))
}

async fn dashboard(state: &AppState, page: &Page<'_>, actor: &Actor, flash: Option<&Notice>) -> String {
    let mut projects = ContentSection::<Project>::new(state.store.clone(), Some(actor.clone()));
    let mut posts = ContentSection::<Post>::new(state.store.clone(), Some(actor.clone()));
    futures::join!(projects.load(), posts.load());
    render::admin(page, actor, &projects, &posts, flash)
}

/// A dashboard form submission.
enum Edit {
    Create(Value),
    Update(String, Value),
    Delete(String),
}

impl Edit {
    fn op(&self) -> WriteOp {
        match self {
            Self::Create(_) => WriteOp::Create,
            Self::Update(..) => WriteOp::Update,
            Self::Delete(_) => WriteOp::Delete,
        }
    }
}

fn form_body(form: web::Form<HashMap<String, String>>) -> Value {
    Value::Object(
        form.into_inner()
            .into_iter()
            .map(|(name, value)| (name, Value::String(value)))
            .collect(),
    )
}

async fn apply<R: ContentRecord>(state: &AppState, actor: Actor, edit: Edit) -> Result<(), AppError> {
    let mut section = ContentSection::<R>::new(state.store.clone(), Some(actor));
    section.load().await;
    match edit {
        Edit::Create(body) => {
            let form = parse_form(&mut section, WriteOp::Create, body)?;
            section.create(form).await?;
        }
        Edit::Update(id, body) => {
            let form = parse_form(&mut section, WriteOp::Update, body)?;
            section.update(&id, form).await?;
        }
        Edit::Delete(id) => {
            section.delete(&id).await?;
        }
    }
    Ok(())
}

/// Runs a dashboard write. Success redirects back to the dashboard with a
/// flash; a rejection re-renders it with the error and a matching status.
async fn submit(
    state: &AppState,
    locale: &str,
    kind: &str,
    actor: Option<Actor>,
    edit: Edit,
) -> HandlerResult {
    let locale = i18n::resolve(locale)?;
    let kind = parse_kind(kind)?;
    let op = edit.op();
    let path = format!("/{}/admin", locale.code());

    let Some(actor) = actor else {
        let rejected = WriteRejected::new(kind, op, RejectReason::NotSignedIn);
        let page = Page {
            locale,
            path: &path,
            site_title: &state.config.site_title,
            actor: None,
        };
        return Ok(HttpResponse::Unauthorized()
            .content_type("text/html; charset=utf-8")
            .body(render::sign_in(&page, Some(&rejected.to_string()))));
    };

    let result = match kind {
        ContentKind::Projects => apply::<Project>(state, actor.clone(), edit).await,
        ContentKind::Posts => apply::<Post>(state, actor.clone(), edit).await,
    };

    match result {
        Ok(()) => Ok(see_other(format!("{}?saved={}-{}", path, kind.slug(), op.slug()))),
        Err(e) => {
            let flash = Notice::error(public_message(&e));
            let page = Page {
                locale,
                path: &path,
                site_title: &state.config.site_title,
                actor: Some(&actor),
            };
            let body = dashboard(state, &page, &actor, Some(&flash)).await;
            Ok(HttpResponse::build(e.status_code())
                .content_type("text/html; charset=utf-8")
                .body(body))
        }
    }
}

pub async fn admin_create(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    actor: CurrentActor,
    form: web::Form<HashMap<String, String>>,
) -> HandlerResult {
    let (locale, kind) = path.into_inner();
    let body = form_body(form);
    submit(&state, &locale, &kind, actor.into_inner(), Edit::Create(body)).await
}

pub async fn admin_update(
    state: web::Data<AppState>,
    path: web::Path<(String, String, String)>,
    actor: CurrentActor,
    form: web::Form<HashMap<String, String>>,
) -> HandlerResult {
    let (locale, kind, id) = path.into_inner();
    let body = form_body(form);
    submit(&state, &locale, &kind, actor.into_inner(), Edit::Update(id, body)).await
}

pub async fn admin_delete(
    state: web::Data<AppState>,
    path: web::Path<(String, String, String)>,
    actor: CurrentActor,
) -> HandlerResult {
    let (locale, kind, id) = path.into_inner();
    submit(&state, &locale, &kind, actor.into_inner(), Edit::Delete(id)).await
}

pub async fn admin_login(
    state: web::Data<AppState>,
    locale: web::Path<String>,
    form: web::Form<Credentials>,
    req: HttpRequest,
) -> HandlerResult {
    let locale = i18n::resolve(&locale)?;

    match open_session(&state, &form).await {
        Ok((token, _)) => Ok(HttpResponse::SeeOther()
            .cookie(session_cookie(&token))
            .insert_header((header::LOCATION, format!("/{}/admin", locale.code())))
            .finish()),
        Err(e) => {
            let path = format!("/{}/admin", locale.code());
            let page = Page {
                locale,
                path: &path,
                site_title: &state.config.site_title,
                actor: None,
            };
            log::debug!("Dashboard sign-in failed from {:?}: {}", req.peer_addr(), e);
            Ok(HttpResponse::Unauthorized()
                .content_type("text/html; charset=utf-8")
                .body(render::sign_in(&page, Some(&public_message(&e)))))
        }
    }
}

pub async fn admin_logout(
    state: web::Data<AppState>,
    locale: web::Path<String>,
    req: HttpRequest,
) -> HandlerResult {
    let locale = i18n::resolve(&locale)?;
    if let Some(token) = session_token(&req) {
        if let Err(e) = state.sessions.end(&token) {
            log::debug!("Sign-out without a live session: {}", e);
        }
    }
    Ok(HttpResponse::SeeOther()
        .cookie(expired_cookie())
        .insert_header((header::LOCATION, format!("/{}", locale.code())))
        .finish())
}

pub async fn contact(
    state: web::Data<AppState>,
    locale: web::Path<String>,
    form: web::Form<ContactForm>,
) -> HandlerResult {
    let locale = i18n::resolve(&locale)?;
    let status = match send_contact(state.store.as_ref(), form.into_inner()).await {
        Ok(_) => ContactStatus::Sent,
        Err(e) => {
            log::warn!("Contact form rejected: {}", e);
            ContactStatus::Failed
        }
    };
    Ok(see_other(format!(
        "/{}?contact={}#contact",
        locale.code(),
        status.as_query()
    )))
}

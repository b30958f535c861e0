// =====================================================
// FILE: src/server/routes.rs - ACTIX-WEB ROUTES
// =====================================================

use super::handlers::{api, auth, content, pages};
use actix_files::Files;
use actix_web::web;
use std::path::Path;

/// Registers every route. Static files and `/api` come before the
/// `/{locale}` pages so a locale segment never shadows them.
pub fn configure(cfg: &mut web::ServiceConfig, static_dir: Option<&Path>) {
    if let Some(dir) = static_dir {
        cfg.service(Files::new("/static", dir).prefer_utf8(true));
    }

    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(api::health))
            .route("/locales", web::get().to(api::locales))
            .route("/locale/switch", web::get().to(api::switch_locale))
            .route("/contact", web::post().to(api::contact))
            .route("/auth/login", web::post().to(auth::login))
            .route("/auth/logout", web::post().to(auth::logout))
            .route("/auth/me", web::get().to(auth::me))
            .route("/admin/stats", web::get().to(api::admin_stats))
            .service(
                web::resource("/content/{kind}")
                    .route(web::get().to(content::list))
                    .route(web::post().to(content::create)),
            )
            .service(
                web::resource("/content/{kind}/{id}")
                    .route(web::put().to(content::update))
                    .route(web::delete().to(content::delete)),
            ),
    )
    .route("/", web::get().to(pages::root))
    .route("/{locale}", web::get().to(pages::home))
    .route("/{locale}/contact", web::post().to(pages::contact))
    .route("/{locale}/admin", web::get().to(pages::admin))
    .route("/{locale}/admin/login", web::post().to(pages::admin_login))
    .route("/{locale}/admin/logout", web::post().to(pages::admin_logout))
    .route("/{locale}/admin/{kind}", web::post().to(pages::admin_create))
    .route("/{locale}/admin/{kind}/{id}", web::post().to(pages::admin_update))
    .route(
        "/{locale}/admin/{kind}/{id}/delete",
        web::post().to(pages::admin_delete),
    );
}

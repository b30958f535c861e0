// =====================================================
// FILE: src/server/handlers/mod.rs - HTTP HANDLERS
// =====================================================

pub mod api;
pub mod auth;
pub mod content;
pub mod pages;

use crate::auth::AuthError;
use crate::content::RejectReason;
use crate::core::error::AppError;
use crate::i18n::LocaleError;
use crate::store::StoreError;
use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;

pub type HandlerResult = std::result::Result<HttpResponse, AppError>;

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) | AppError::Locale(LocaleError::NotFound(_)) => {
                StatusCode::NOT_FOUND
            }
            AppError::Auth(AuthError::Provider(_)) => StatusCode::BAD_GATEWAY,
            AppError::Auth(_) => StatusCode::UNAUTHORIZED,
            AppError::WriteRejected(rejected) => match &rejected.reason {
                RejectReason::NotSignedIn => StatusCode::UNAUTHORIZED,
                RejectReason::FallbackMode => StatusCode::CONFLICT,
                RejectReason::Invalid(_) => StatusCode::BAD_REQUEST,
                RejectReason::Store(StoreError::NotFound { .. }) => StatusCode::NOT_FOUND,
                RejectReason::Store(_) => StatusCode::BAD_GATEWAY,
            },
            AppError::Store(_) => StatusCode::BAD_GATEWAY,
            AppError::Io(_) | AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("{}", self);
        }
        HttpResponse::build(status).json(json!({ "error": public_message(self) }))
    }
}

/// The part of an error that is safe and useful to show a visitor.
pub(crate) fn public_message(err: &AppError) -> String {
    match err {
        AppError::Validation(msg) | AppError::NotFound(msg) => msg.clone(),
        AppError::WriteRejected(rejected) => rejected.to_string(),
        AppError::Auth(e) => e.to_string(),
        AppError::Locale(e) => e.to_string(),
        AppError::Store(_) => "The database is not reachable".to_string(),
        AppError::Io(_) | AppError::Config(_) => "Internal server error".to_string(),
    }
}

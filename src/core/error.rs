use crate::auth::AuthError;
use crate::content::WriteRejected;
use crate::i18n::LocaleError;
use crate::store::StoreError;
use std::io;

#[derive(Debug)]
pub enum AppError {
    Io(io::Error),
    Validation(String),
    NotFound(String),
    Config(String),
    Store(StoreError),
    WriteRejected(WriteRejected),
    Auth(AuthError),
    Locale(LocaleError),
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Io(err)
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Store(err)
    }
}

impl From<WriteRejected> for AppError {
    fn from(err: WriteRejected) -> Self {
        AppError::WriteRejected(err)
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        AppError::Auth(err)
    }
}

impl From<LocaleError> for AppError {
    fn from(err: LocaleError) -> Self {
        AppError::Locale(err)
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Io(err) => write!(f, "IO Error: {}", err),
            AppError::Validation(msg) => write!(f, "Validation Error: {}", msg),
            AppError::NotFound(what) => write!(f, "Not Found: {}", what),
            AppError::Config(msg) => write!(f, "Config Error: {}", msg),
            AppError::Store(err) => write!(f, "Store Error: {}", err),
            AppError::WriteRejected(err) => write!(f, "Write Rejected: {}", err),
            AppError::Auth(err) => write!(f, "Auth Error: {}", err),
            AppError::Locale(err) => write!(f, "Locale Error: {}", err),
        }
    }
}

impl std::error::Error for AppError {}
pub type Result<T> = std::result::Result<T, AppError>;

// =====================================================
// FILE: src/store/mod.rs - DOCUMENT STORE COLLABORATOR
// =====================================================

pub mod firestore;
pub mod memory;
pub mod offline;

pub use firestore::FirestoreStore;
pub use memory::MemoryStore;
pub use offline::OfflineStore;

use crate::auth::Credential;
use futures::future::BoxFuture;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::sync::Arc;

/// Field every content collection is ordered by.
pub const CREATED_AT: &str = "createdAt";

pub type Fields = Map<String, Value>;

/// A stored document: the store-assigned key plus its fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StoreError {
    /// Network failure, misconfiguration or an offline backend.
    Unavailable(String),
    PermissionDenied(String),
    NotFound { collection: String, id: String },
    InvalidDocument(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(msg) => write!(f, "store unavailable: {}", msg),
            Self::PermissionDenied(msg) => write!(f, "permission denied: {}", msg),
            Self::NotFound { collection, id } => {
                write!(f, "document {}/{} not found", collection, id)
            }
            Self::InvalidDocument(msg) => write!(f, "invalid document: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
pub type StoreFuture<'a, T> = BoxFuture<'a, StoreResult<T>>;

/// The four operation shapes the content layer issues against the database.
pub trait DocumentStore: Send + Sync {
    fn name(&self) -> &'static str;

    fn query_ordered<'a>(
        &'a self,
        collection: &'a str,
        order_by: &'a str,
        order: SortOrder,
    ) -> StoreFuture<'a, Vec<Document>>;

    /// Returns the key assigned to the new document.
    fn create<'a>(&'a self, collection: &'a str, fields: Fields) -> StoreFuture<'a, String>;

    /// Merges `fields` into an existing document.
    fn update<'a>(&'a self, collection: &'a str, id: &'a str, fields: Fields)
        -> StoreFuture<'a, ()>;

    fn delete<'a>(&'a self, collection: &'a str, id: &'a str) -> StoreFuture<'a, ()>;

    /// A view of this store that issues requests as the signed-in caller.
    /// Backends without per-request identity return `None` and are used as is.
    fn as_caller(&self, _credential: &Credential) -> Option<Arc<dyn DocumentStore>> {
        None
    }
}

/// Ordering used for `orderBy`: timestamps chronologically, numbers numerically,
/// everything else by its JSON text. Missing values sort first.
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(Value::String(x)), Some(Value::String(y))) => {
            match (
                chrono::DateTime::parse_from_rfc3339(x),
                chrono::DateTime::parse_from_rfc3339(y),
            ) {
                (Ok(dx), Ok(dy)) => dx.cmp(&dy),
                _ => x.cmp(y),
            }
        }
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(x), Some(y)) => x.to_string().cmp(&y.to_string()),
    }
}

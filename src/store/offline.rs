// src/store/offline.rs
use super::{Document, DocumentStore, Fields, SortOrder, StoreError, StoreFuture};
use futures::FutureExt;

/// A store with no database behind it. Every call fails with
/// [`StoreError::Unavailable`], so sections run on their example data.
#[derive(Debug, Clone)]
pub struct OfflineStore {
    reason: String,
}

impl OfflineStore {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    fn fail<'a, T: Send + 'a>(&self) -> StoreFuture<'a, T> {
        futures::future::ready(Err(StoreError::Unavailable(self.reason.clone()))).boxed()
    }
}

impl Default for OfflineStore {
    fn default() -> Self {
        Self::new("no database configured")
    }
}

impl DocumentStore for OfflineStore {
    fn name(&self) -> &'static str {
        "offline"
    }

    fn query_ordered<'a>(
        &'a self,
        _collection: &'a str,
        _order_by: &'a str,
        _order: SortOrder,
    ) -> StoreFuture<'a, Vec<Document>> {
        self.fail()
    }

    fn create<'a>(&'a self, _collection: &'a str, _fields: Fields) -> StoreFuture<'a, String> {
        self.fail()
    }

    fn update<'a>(
        &'a self,
        _collection: &'a str,
        _id: &'a str,
        _fields: Fields,
    ) -> StoreFuture<'a, ()> {
        self.fail()
    }

    fn delete<'a>(&'a self, _collection: &'a str, _id: &'a str) -> StoreFuture<'a, ()> {
        self.fail()
    }
}

// src/store/memory.rs
use super::{
    compare_values, Document, DocumentStore, Fields, SortOrder, StoreError, StoreFuture,
    StoreResult,
};
use futures::FutureExt;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

type Collections = HashMap<String, Vec<Document>>;

/// In-process document store, optionally snapshotted to a JSON file after
/// every write.
///
/// Writes are serialized and staged on a copy of the collections; the copy
/// replaces the live map only once its snapshot is on disk, so a failed
/// write leaves nothing behind.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<Collections>,
    snapshot: Option<PathBuf>,
    writer: tokio::sync::Mutex<()>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a store backed by `path`, loading it if the file already exists.
    pub async fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let collections = if path.exists() {
            let content = tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| StoreError::Unavailable(format!("{}: {}", path.display(), e)))?;
            Self::parse_snapshot(&content)?
        } else {
            Collections::new()
        };

        log::info!(
            "Memory store opened at {} ({} collections)",
            path.display(),
            collections.len()
        );

        Ok(Self {
            collections: RwLock::new(collections),
            snapshot: Some(path),
            writer: tokio::sync::Mutex::new(()),
        })
    }

    pub fn len(&self, collection: &str) -> usize {
        self.read().get(collection).map_or(0, Vec::len)
    }

    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Collections> {
        self.collections.read().unwrap_or_else(|p| p.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Collections> {
        self.collections.write().unwrap_or_else(|p| p.into_inner())
    }

    fn parse_snapshot(content: &str) -> StoreResult<Collections> {
        if content.trim().is_empty() {
            return Ok(Collections::new());
        }
        let raw: BTreeMap<String, Vec<Fields>> = serde_json::from_str(content)
            .map_err(|e| StoreError::InvalidDocument(format!("snapshot: {}", e)))?;

        raw.into_iter()
            .map(|(name, docs)| {
                let docs = docs
                    .into_iter()
                    .map(|mut fields| match fields.remove("id") {
                        Some(Value::String(id)) => Ok(Document { id, fields }),
                        _ => Err(StoreError::InvalidDocument(format!(
                            "snapshot document in '{}' has no id",
                            name
                        ))),
                    })
                    .collect::<StoreResult<Vec<_>>>()?;
                Ok((name, docs))
            })
            .collect()
    }

    fn render_snapshot(collections: &Collections) -> StoreResult<String> {
        let raw: BTreeMap<&String, Vec<Fields>> = collections
            .iter()
            .map(|(name, docs)| {
                let docs = docs
                    .iter()
                    .map(|doc| {
                        let mut fields = doc.fields.clone();
                        fields.insert("id".into(), Value::String(doc.id.clone()));
                        fields
                    })
                    .collect();
                (name, docs)
            })
            .collect();

        serde_json::to_string_pretty(&raw)
            .map_err(|e| StoreError::InvalidDocument(format!("snapshot: {}", e)))
    }

    /// Applies `change` to a copy of the collections, persists the copy and
    /// only then makes it visible.
    async fn commit<T>(
        &self,
        change: impl FnOnce(&mut Collections) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let _writer = self.writer.lock().await;
        let mut staged = self.read().clone();
        let out = change(&mut staged)?;
        self.persist(&staged).await?;
        *self.write() = staged;
        Ok(out)
    }

    async fn persist(&self, collections: &Collections) -> StoreResult<()> {
        let Some(path) = &self.snapshot else {
            return Ok(());
        };

        let content = Self::render_snapshot(collections)?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        }

        let temp_path = path.with_extension(format!("{}.tmp", uuid::Uuid::new_v4().simple()));
        if let Err(e) = tokio::fs::write(&temp_path, content).await {
            return Err(StoreError::Unavailable(format!("{}: {}", temp_path.display(), e)));
        }
        if let Err(e) = tokio::fs::rename(&temp_path, path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(StoreError::Unavailable(format!("{}: {}", path.display(), e)));
        }
        Ok(())
    }
}

impl DocumentStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn query_ordered<'a>(
        &'a self,
        collection: &'a str,
        order_by: &'a str,
        order: SortOrder,
    ) -> StoreFuture<'a, Vec<Document>> {
        let mut docs = self.read().get(collection).cloned().unwrap_or_default();
        docs.sort_by(|a, b| {
            let ord = compare_values(a.fields.get(order_by), b.fields.get(order_by));
            match order {
                SortOrder::Ascending => ord,
                SortOrder::Descending => ord.reverse(),
            }
        });
        futures::future::ready(Ok(docs)).boxed()
    }

    fn create<'a>(&'a self, collection: &'a str, fields: Fields) -> StoreFuture<'a, String> {
        async move {
            let id = uuid::Uuid::new_v4().simple().to_string();
            self.commit(|collections| {
                collections
                    .entry(collection.to_string())
                    .or_default()
                    .push(Document {
                        id: id.clone(),
                        fields,
                    });
                Ok(())
            })
            .await?;
            log::debug!("memory store: created {}/{}", collection, id);
            Ok(id)
        }
        .boxed()
    }

    fn update<'a>(
        &'a self,
        collection: &'a str,
        id: &'a str,
        fields: Fields,
    ) -> StoreFuture<'a, ()> {
        self.commit(move |collections| {
            let doc = collections
                .get_mut(collection)
                .and_then(|docs| docs.iter_mut().find(|d| d.id == id))
                .ok_or_else(|| StoreError::NotFound {
                    collection: collection.to_string(),
                    id: id.to_string(),
                })?;
            doc.fields.extend(fields);
            Ok(())
        })
        .boxed()
    }

    fn delete<'a>(&'a self, collection: &'a str, id: &'a str) -> StoreFuture<'a, ()> {
        self.commit(move |collections| {
            let removed = collections.get_mut(collection).is_some_and(|docs| {
                let before = docs.len();
                docs.retain(|d| d.id != id);
                docs.len() != before
            });
            if removed {
                Ok(())
            } else {
                Err(StoreError::NotFound {
                    collection: collection.to_string(),
                    id: id.to_string(),
                })
            }
        })
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::CREATED_AT;
    use serde_json::json;

    fn fields(title: &str, created_at: &str) -> Fields {
        json!({ "title": title, "createdAt": created_at })
            .as_object()
            .cloned()
            .unwrap()
    }

    #[tokio::test]
    async fn test_query_is_newest_first() {
        let store = MemoryStore::new();
        store
            .create("projects", fields("old", "2024-01-01T00:00:00Z"))
            .await
            .unwrap();
        store
            .create("projects", fields("new", "2024-03-01T00:00:00Z"))
            .await
            .unwrap();
        store
            .create("projects", fields("mid", "2024-02-01T00:00:00Z"))
            .await
            .unwrap();

        let docs = store
            .query_ordered("projects", CREATED_AT, SortOrder::Descending)
            .await
            .unwrap();
        let titles: Vec<_> = docs
            .iter()
            .map(|d| d.fields["title"].as_str().unwrap())
            .collect();
        assert_eq!(titles, ["new", "mid", "old"]);
    }

    #[tokio::test]
    async fn test_empty_collection_is_ok() {
        let store = MemoryStore::new();
        let docs = store
            .query_ordered("blog-posts", CREATED_AT, SortOrder::Descending)
            .await
            .unwrap();
        assert!(docs.is_empty());
    }

    #[tokio::test]
    async fn test_update_merges_and_delete_removes() {
        let store = MemoryStore::new();
        let id = store
            .create("projects", fields("draft", "2024-01-01T00:00:00Z"))
            .await
            .unwrap();

        let patch = json!({ "title": "final" }).as_object().cloned().unwrap();
        store.update("projects", &id, patch).await.unwrap();

        let docs = store
            .query_ordered("projects", CREATED_AT, SortOrder::Descending)
            .await
            .unwrap();
        assert_eq!(docs[0].fields["title"], "final");
        assert_eq!(docs[0].fields["createdAt"], "2024-01-01T00:00:00Z");

        store.delete("projects", &id).await.unwrap();
        assert!(store.is_empty("projects"));
    }

    #[tokio::test]
    async fn test_missing_key_is_not_found() {
        let store = MemoryStore::new();
        let err = store.delete("projects", "nope").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));

        let err = store
            .update("projects", "nope", Fields::new())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_snapshot_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("content.json");

        let id = {
            let store = MemoryStore::open(&path).await.unwrap();
            store
                .create("contacts", fields("hello", "2024-01-01T00:00:00Z"))
                .await
                .unwrap()
        };

        let reopened = MemoryStore::open(&path).await.unwrap();
        assert_eq!(reopened.len("contacts"), 1);
        let docs = reopened
            .query_ordered("contacts", CREATED_AT, SortOrder::Ascending)
            .await
            .unwrap();
        assert_eq!(docs[0].id, id);
        assert!(!docs[0].fields.contains_key("id"));
    }

    #[tokio::test]
    async fn test_failed_snapshot_leaves_collections_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("content.json");
        let store = MemoryStore::open(&path).await.unwrap();
        let id = store
            .create("projects", fields("kept", "2024-01-01T00:00:00Z"))
            .await
            .unwrap();

        // The snapshot can no longer be replaced by a rename.
        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();

        let err = store
            .create("projects", fields("lost", "2024-02-01T00:00:00Z"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
        assert_eq!(store.len("projects"), 1);

        let patch = json!({ "title": "changed" }).as_object().cloned().unwrap();
        assert!(store.update("projects", &id, patch).await.is_err());
        assert!(store.delete("projects", &id).await.is_err());

        let docs = store
            .query_ordered("projects", CREATED_AT, SortOrder::Descending)
            .await
            .unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].fields["title"], "kept");

        let leftovers = std::fs::read_dir(dir.path())
            .unwrap()
            .filter(|e| {
                e.as_ref()
                    .is_ok_and(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            })
            .count();
        assert_eq!(leftovers, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_writes_all_persist() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("content.json");
        let store = std::sync::Arc::new(MemoryStore::open(&path).await.unwrap());

        let writes = (0..100).map(|i| {
            let store = store.clone();
            tokio::spawn(async move {
                store
                    .create("contacts", fields(&format!("m{}", i), "2024-01-01T00:00:00Z"))
                    .await
            })
        });
        for result in futures::future::join_all(writes).await {
            assert!(result.unwrap().is_ok());
        }

        assert_eq!(store.len("contacts"), 100);
        let reopened = MemoryStore::open(&path).await.unwrap();
        assert_eq!(reopened.len("contacts"), 100);
    }
}

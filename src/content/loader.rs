// =====================================================
// FILE: src/content/loader.rs - ONE LISTING SECTION
// =====================================================

use super::{
    load_warning_text, success_text, ContactForm, ContentKind, ContentRecord, LoadOutcome,
    Notice, RecordForm, RejectReason, ViewMode, WriteOp, WriteRejected, CONTACTS_COLLECTION,
};
use crate::auth::Actor;
use crate::core::prelude::{AppError, Result};
use crate::store::{DocumentStore, SortOrder, StoreResult, CREATED_AT};
use chrono::Utc;
use std::sync::Arc;

pub type WriteResult<R> = std::result::Result<LoadOutcome<R>, WriteRejected>;

/// One listing (projects or posts) as seen by one visitor.
///
/// A section is built per request and owns its list, view mode and notices.
/// Writes check the signed-in actor first, then the view mode established
/// by the last [`load`](Self::load); a section that was never loaded is
/// treated as live.
pub struct ContentSection<R: ContentRecord> {
    store: Arc<dyn DocumentStore>,
    actor: Option<Actor>,
    records: Vec<R>,
    mode: ViewMode,
    notices: Vec<Notice>,
}

impl<R: ContentRecord> ContentSection<R> {
    /// Store calls run as the actor when the backend supports per-caller
    /// access and the actor carries a provider credential.
    pub fn new(store: Arc<dyn DocumentStore>, actor: Option<Actor>) -> Self {
        let store = actor
            .as_ref()
            .and_then(|a| a.credential.as_ref())
            .and_then(|c| store.as_caller(c))
            .unwrap_or(store);
        Self {
            store,
            actor,
            records: Vec::new(),
            mode: ViewMode::Live,
            notices: Vec::new(),
        }
    }

    pub fn kind(&self) -> ContentKind {
        R::KIND
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn actor(&self) -> Option<&Actor> {
        self.actor.as_ref()
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub async fn load(&mut self) -> LoadOutcome<R> {
        self.mode = ViewMode::Live;

        let result = self
            .store
            .query_ordered(R::KIND.collection(), CREATED_AT, SortOrder::Descending)
            .await
            .and_then(|docs| {
                docs.into_iter()
                    .map(R::from_document)
                    .collect::<StoreResult<Vec<R>>>()
            });

        match result {
            Ok(records) => {
                log::debug!(
                    "Loaded {} {} from {}",
                    records.len(),
                    R::KIND,
                    self.store.name()
                );
                self.records = records.clone();
                LoadOutcome::Live(records)
            }
            Err(reason) => {
                log::warn!("Loading {} failed, using example data: {}", R::KIND, reason);
                self.records = R::fallback();
                self.mode = ViewMode::Fallback;
                if self.actor.is_some() {
                    self.notices.push(Notice::warning(load_warning_text(R::KIND)));
                }
                LoadOutcome::Degraded(self.records.clone(), reason)
            }
        }
    }

    pub async fn create(&mut self, form: R::Form) -> WriteResult<R> {
        let actor = self.authorize(WriteOp::Create, &form)?;
        let fields = form
            .into_record(&actor, Utc::now())
            .to_fields()
            .map_err(|e| self.reject(WriteOp::Create, RejectReason::Store(e)))?;

        match self.store.create(R::KIND.collection(), fields).await {
            Ok(id) => {
                log::info!("{} created {}/{}", actor.email, R::KIND.collection(), id);
                self.finish(WriteOp::Create).await
            }
            Err(e) => Err(self.reject(WriteOp::Create, RejectReason::Store(e))),
        }
    }

    pub async fn update(&mut self, id: &str, form: R::Form) -> WriteResult<R> {
        let actor = self.authorize(WriteOp::Update, &form)?;
        let fields = form
            .into_record(&actor, Utc::now())
            .to_fields()
            .map_err(|e| self.reject(WriteOp::Update, RejectReason::Store(e)))?;

        match self.store.update(R::KIND.collection(), id, fields).await {
            Ok(()) => {
                log::info!("{} updated {}/{}", actor.email, R::KIND.collection(), id);
                self.finish(WriteOp::Update).await
            }
            Err(e) => Err(self.reject(WriteOp::Update, RejectReason::Store(e))),
        }
    }

    pub async fn delete(&mut self, id: &str) -> WriteResult<R> {
        let actor = self.check_actor_and_mode(WriteOp::Delete)?;

        match self.store.delete(R::KIND.collection(), id).await {
            Ok(()) => {
                log::info!("{} deleted {}/{}", actor.email, R::KIND.collection(), id);
                self.finish(WriteOp::Delete).await
            }
            Err(e) => Err(self.reject(WriteOp::Delete, RejectReason::Store(e))),
        }
    }

    /// Runs the sign-in and demo-mode checks a write would run, without
    /// touching the store.
    pub fn ensure_writable(&mut self, op: WriteOp) -> std::result::Result<(), WriteRejected> {
        self.check_actor_and_mode(op).map(|_| ())
    }

    fn authorize(&mut self, op: WriteOp, form: &R::Form) -> std::result::Result<Actor, WriteRejected> {
        let actor = self.check_actor_and_mode(op)?;
        form.validate()
            .map_err(|msg| self.reject(op, RejectReason::Invalid(msg)))?;
        Ok(actor)
    }

    fn check_actor_and_mode(&mut self, op: WriteOp) -> std::result::Result<Actor, WriteRejected> {
        let Some(actor) = self.actor.clone() else {
            return Err(self.reject(op, RejectReason::NotSignedIn));
        };
        if self.mode.is_fallback() {
            return Err(self.reject(op, RejectReason::FallbackMode));
        }
        Ok(actor)
    }

    async fn finish(&mut self, op: WriteOp) -> WriteResult<R> {
        self.notices.push(Notice::success(success_text(R::KIND, op)));
        Ok(self.load().await)
    }

    fn reject(&mut self, op: WriteOp, reason: RejectReason) -> WriteRejected {
        let rejected = WriteRejected::new(R::KIND, op, reason);
        match &rejected.reason {
            RejectReason::Store(e) => log::error!("{:?} on {} failed: {}", op, R::KIND, e),
            _ => log::debug!("{:?} on {} rejected: {}", op, R::KIND, rejected),
        }
        self.notices.push(Notice::error(rejected.to_string()));
        rejected
    }
}

/// Stores a contact-form message. Anyone may write one; nothing reads them
/// back through the site.
pub async fn send_contact(store: &dyn DocumentStore, form: ContactForm) -> Result<String> {
    form.validate().map_err(AppError::Validation)?;
    let fields = form.into_message(Utc::now()).to_fields()?;
    let id = store.create(CONTACTS_COLLECTION, fields).await?;
    log::info!("Contact message stored as {}", id);
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Credential;
    use crate::content::{NoticeLevel, PostForm, Project, ProjectForm};
    use crate::store::{Document, Fields, MemoryStore, OfflineStore, StoreError, StoreFuture};
    use futures::FutureExt;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// Memory store that counts calls and can be switched to failing.
    #[derive(Default)]
    struct CountingStore {
        inner: MemoryStore,
        calls: AtomicUsize,
        failing: AtomicBool,
    }

    impl CountingStore {
        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn set_failing(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }

        fn gate(&self) -> StoreResult<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.failing.load(Ordering::SeqCst) {
                Err(StoreError::Unavailable("switched off".into()))
            } else {
                Ok(())
            }
        }
    }

    impl DocumentStore for CountingStore {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn query_ordered<'a>(
            &'a self,
            collection: &'a str,
            order_by: &'a str,
            order: SortOrder,
        ) -> StoreFuture<'a, Vec<Document>> {
            match self.gate() {
                Ok(()) => self.inner.query_ordered(collection, order_by, order),
                Err(e) => futures::future::ready(Err(e)).boxed(),
            }
        }

        fn create<'a>(&'a self, collection: &'a str, fields: Fields) -> StoreFuture<'a, String> {
            match self.gate() {
                Ok(()) => self.inner.create(collection, fields),
                Err(e) => futures::future::ready(Err(e)).boxed(),
            }
        }

        fn update<'a>(
            &'a self,
            collection: &'a str,
            id: &'a str,
            fields: Fields,
        ) -> StoreFuture<'a, ()> {
            match self.gate() {
                Ok(()) => self.inner.update(collection, id, fields),
                Err(e) => futures::future::ready(Err(e)).boxed(),
            }
        }

        fn delete<'a>(&'a self, collection: &'a str, id: &'a str) -> StoreFuture<'a, ()> {
            match self.gate() {
                Ok(()) => self.inner.delete(collection, id),
                Err(e) => futures::future::ready(Err(e)).boxed(),
            }
        }
    }

    /// Memory store that hands out per-caller views and records the token
    /// each write ran under.
    #[derive(Default, Clone)]
    struct PerCallerStore {
        inner: Arc<MemoryStore>,
        token: Option<String>,
        writes: Arc<std::sync::Mutex<Vec<Option<String>>>>,
    }

    impl PerCallerStore {
        fn record(&self) {
            self.writes.lock().unwrap().push(self.token.clone());
        }

        fn writes(&self) -> Vec<Option<String>> {
            self.writes.lock().unwrap().clone()
        }
    }

    impl DocumentStore for PerCallerStore {
        fn name(&self) -> &'static str {
            "per-caller"
        }

        fn query_ordered<'a>(
            &'a self,
            collection: &'a str,
            order_by: &'a str,
            order: SortOrder,
        ) -> StoreFuture<'a, Vec<Document>> {
            self.inner.query_ordered(collection, order_by, order)
        }

        fn create<'a>(&'a self, collection: &'a str, fields: Fields) -> StoreFuture<'a, String> {
            self.record();
            self.inner.create(collection, fields)
        }

        fn update<'a>(
            &'a self,
            collection: &'a str,
            id: &'a str,
            fields: Fields,
        ) -> StoreFuture<'a, ()> {
            self.record();
            self.inner.update(collection, id, fields)
        }

        fn delete<'a>(&'a self, collection: &'a str, id: &'a str) -> StoreFuture<'a, ()> {
            self.record();
            self.inner.delete(collection, id)
        }

        fn as_caller(&self, credential: &Credential) -> Option<Arc<dyn DocumentStore>> {
            Some(Arc::new(Self {
                token: Some(credential.token().to_string()),
                ..self.clone()
            }))
        }
    }

    fn actor() -> Actor {
        Actor::new("u1", "ali@example.com", Some("Ali".into()))
    }

    fn project_form(title: &str) -> ProjectForm {
        ProjectForm {
            title: title.into(),
            description: "desc".into(),
            technologies: "Rust, Actix".into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_writes_run_as_the_signed_in_caller() {
        let store = PerCallerStore::default();

        let mut signed_in = actor();
        signed_in.credential = Some(Credential::new("id-token-1", None));
        let mut section = ContentSection::<Project>::new(Arc::new(store.clone()), Some(signed_in));
        section.load().await;
        let outcome = section.create(project_form("as caller")).await.unwrap();
        let id = outcome.records()[0].id.clone().unwrap();

        let mut section = ContentSection::<Project>::new(Arc::new(store.clone()), Some(actor()));
        section.load().await;
        section.delete(&id).await.unwrap();

        assert_eq!(store.writes(), [Some("id-token-1".to_string()), None]);
        assert!(store.inner.is_empty("projects"));
    }

    #[tokio::test]
    async fn test_store_failure_falls_back() {
        let store = Arc::new(OfflineStore::default());
        let mut section = ContentSection::<Project>::new(store, Some(actor()));

        let outcome = section.load().await;
        assert!(matches!(outcome, LoadOutcome::Degraded(_, StoreError::Unavailable(_))));
        assert_eq!(outcome.records(), Project::fallback().as_slice());
        assert_eq!(section.mode(), ViewMode::Fallback);
        assert_eq!(section.notices().len(), 1);
        assert_eq!(section.notices()[0].level, NoticeLevel::Warning);
    }

    #[tokio::test]
    async fn test_anonymous_fallback_has_no_notice() {
        let mut section = ContentSection::<Project>::new(Arc::new(OfflineStore::default()), None);
        section.load().await;
        assert!(section.mode().is_fallback());
        assert!(section.notices().is_empty());
    }

    #[tokio::test]
    async fn test_empty_store_is_live_not_fallback() {
        let mut section = ContentSection::<Project>::new(Arc::new(MemoryStore::new()), None);
        let outcome = section.load().await;
        assert_eq!(outcome, LoadOutcome::Live(Vec::new()));
        assert_eq!(section.mode(), ViewMode::Live);
    }

    #[tokio::test]
    async fn test_reload_after_recovery_is_live() {
        let store = Arc::new(CountingStore::default());
        let mut section = ContentSection::<Project>::new(store.clone(), Some(actor()));

        store.set_failing(true);
        section.load().await;
        assert!(section.mode().is_fallback());

        store.set_failing(false);
        let outcome = section.load().await;
        assert_eq!(outcome.mode(), ViewMode::Live);
        assert!(section.records().is_empty());
    }

    #[tokio::test]
    async fn test_write_without_actor_makes_no_store_call() {
        let store = Arc::new(CountingStore::default());
        let mut section = ContentSection::<Project>::new(store.clone(), None);
        section.load().await;
        let before = store.calls();

        let err = section.create(project_form("x")).await.unwrap_err();
        assert_eq!(err.reason, RejectReason::NotSignedIn);
        let err = section.delete("any").await.unwrap_err();
        assert_eq!(err.reason, RejectReason::NotSignedIn);
        assert_eq!(store.calls(), before);
    }

    #[tokio::test]
    async fn test_write_in_fallback_makes_no_store_call() {
        let store = Arc::new(CountingStore::default());
        store.set_failing(true);
        let mut section = ContentSection::<Project>::new(store.clone(), Some(actor()));
        section.load().await;
        store.set_failing(false);
        let before = store.calls();

        let err = section.update("1", project_form("x")).await.unwrap_err();
        assert_eq!(err.reason, RejectReason::FallbackMode);
        let err = section.delete("1").await.unwrap_err();
        assert_eq!(err.reason, RejectReason::FallbackMode);
        assert_eq!(store.calls(), before);
        assert_eq!(section.records(), Project::fallback().as_slice());
    }

    #[tokio::test]
    async fn test_missing_actor_checked_before_mode() {
        let mut section = ContentSection::<Project>::new(Arc::new(OfflineStore::default()), None);
        section.load().await;
        let err = section.create(project_form("x")).await.unwrap_err();
        assert_eq!(err.reason, RejectReason::NotSignedIn);
    }

    #[tokio::test]
    async fn test_create_refreshes_newest_first() {
        let store = Arc::new(MemoryStore::new());
        let mut section = ContentSection::<Project>::new(store, Some(actor()));
        section.load().await;

        section.create(project_form("first")).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let outcome = section.create(project_form("second")).await.unwrap();

        let titles: Vec<_> = outcome.records().iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, ["second", "first"]);
        let newest = &outcome.records()[0];
        assert_eq!(newest.technologies, ["Rust", "Actix"]);
        assert_eq!(newest.author_id.as_deref(), Some("u1"));
        assert_eq!(newest.author_name.as_deref(), Some("Ali"));
        assert!(newest.id.is_some());
        assert_eq!(section.notices().last().map(|n| n.level), Some(NoticeLevel::Success));
    }

    #[tokio::test]
    async fn test_update_and_delete_round() {
        let store = Arc::new(MemoryStore::new());
        let mut section = ContentSection::<crate::content::Post>::new(store, Some(actor()));
        section.load().await;

        let outcome = section
            .create(PostForm {
                title: "Draft".into(),
                content: "body".into(),
                tags: "a, b, a".into(),
                ..Default::default()
            })
            .await
            .unwrap();
        let id = outcome.records()[0].id.clone().unwrap();
        assert_eq!(outcome.records()[0].tags, ["a", "b", "a"]);

        let outcome = section
            .update(
                &id,
                PostForm {
                    title: "Final".into(),
                    content: "body".into(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(outcome.records()[0].title, "Final");
        assert!(outcome.records()[0].tags.is_empty());

        let outcome = section.delete(&id).await.unwrap();
        assert!(outcome.records().is_empty());
    }

    #[tokio::test]
    async fn test_failed_write_leaves_list_untouched() {
        let store = Arc::new(CountingStore::default());
        let mut section = ContentSection::<Project>::new(store.clone(), Some(actor()));
        section.create(project_form("kept")).await.unwrap();
        let before = section.records().to_vec();

        store.set_failing(true);
        let err = section.create(project_form("lost")).await.unwrap_err();
        assert!(err.is_store_failure());
        assert_eq!(section.records(), before.as_slice());
        assert_eq!(section.mode(), ViewMode::Live);
        assert_eq!(section.notices().last().map(|n| n.level), Some(NoticeLevel::Error));
    }

    #[tokio::test]
    async fn test_missing_key_is_store_rejection() {
        let mut section =
            ContentSection::<Project>::new(Arc::new(MemoryStore::new()), Some(actor()));
        section.load().await;
        let err = section.delete("ghost").await.unwrap_err();
        assert!(matches!(
            err.reason,
            RejectReason::Store(StoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_invalid_form_makes_no_store_call() {
        let store = Arc::new(CountingStore::default());
        let mut section = ContentSection::<Project>::new(store.clone(), Some(actor()));
        let err = section.create(project_form("  ")).await.unwrap_err();
        assert!(matches!(err.reason, RejectReason::Invalid(_)));
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn test_contact_requires_every_field() {
        let store = MemoryStore::new();
        let err = send_contact(
            &store,
            ContactForm {
                name: "Ali".into(),
                email: "ali@example.com".into(),
                message: String::new(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(store.is_empty(CONTACTS_COLLECTION));

        send_contact(
            &store,
            ContactForm {
                name: "Ali".into(),
                email: "ali@example.com".into(),
                message: "Hello".into(),
            },
        )
        .await
        .unwrap();
        assert_eq!(store.len(CONTACTS_COLLECTION), 1);
    }
}

// =====================================================
// FILE: src/content/mod.rs - CONTENT LOADER WITH FALLBACK
// =====================================================

pub mod fallback;
pub mod forms;
pub mod loader;
pub mod record;

pub use forms::{normalize_tags, ContactForm, PostForm, ProjectForm, RecordForm};
pub use loader::{send_contact, ContentSection};
pub use record::{ContactMessage, ContentRecord, Post, Project};

use crate::store::StoreError;
use serde::{Deserialize, Serialize};

pub const CONTACTS_COLLECTION: &str = "contacts";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Projects,
    Posts,
}

impl ContentKind {
    pub const ALL: [ContentKind; 2] = [ContentKind::Projects, ContentKind::Posts];

    pub fn collection(self) -> &'static str {
        match self {
            Self::Projects => "projects",
            Self::Posts => "blog-posts",
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            Self::Projects => "projects",
            Self::Posts => "posts",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.slug() == slug)
    }

    fn singular(self) -> &'static str {
        match self {
            Self::Projects => "project",
            Self::Posts => "blog post",
        }
    }

    fn plural(self) -> &'static str {
        match self {
            Self::Projects => "projects",
            Self::Posts => "blog posts",
        }
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

/// Whether a section shows store data or the compiled-in examples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Live,
    Fallback,
}

impl ViewMode {
    pub fn is_fallback(self) -> bool {
        self == Self::Fallback
    }
}

/// Result of a load: live data, or the example set plus the reason the
/// store could not be read.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome<R> {
    Live(Vec<R>),
    Degraded(Vec<R>, StoreError),
}

impl<R> LoadOutcome<R> {
    pub fn records(&self) -> &[R] {
        match self {
            Self::Live(records) | Self::Degraded(records, _) => records,
        }
    }

    pub fn into_records(self) -> Vec<R> {
        match self {
            Self::Live(records) | Self::Degraded(records, _) => records,
        }
    }

    pub fn mode(&self) -> ViewMode {
        match self {
            Self::Live(_) => ViewMode::Live,
            Self::Degraded(..) => ViewMode::Fallback,
        }
    }

    pub fn reason(&self) -> Option<&StoreError> {
        match self {
            Self::Live(_) => None,
            Self::Degraded(_, reason) => Some(reason),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

/// A non-blocking, user-visible message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOp {
    Create,
    Update,
    Delete,
}

impl WriteOp {
    pub const ALL: [WriteOp; 3] = [Self::Create, Self::Update, Self::Delete];

    pub fn slug(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.slug() == slug)
    }

    fn verb(self) -> &'static str {
        match self {
            Self::Create => "add",
            Self::Update => "edit",
            Self::Delete => "delete",
        }
    }

    fn past(self) -> &'static str {
        match self {
            Self::Create => "added",
            Self::Update => "updated",
            Self::Delete => "deleted",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RejectReason {
    NotSignedIn,
    FallbackMode,
    Invalid(String),
    Store(StoreError),
}

/// A create/update/delete that had no effect.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteRejected {
    pub kind: ContentKind,
    pub op: WriteOp,
    pub reason: RejectReason,
}

impl WriteRejected {
    pub fn new(kind: ContentKind, op: WriteOp, reason: RejectReason) -> Self {
        Self { kind, op, reason }
    }

    pub fn is_store_failure(&self) -> bool {
        matches!(self.reason, RejectReason::Store(_))
    }
}

impl std::fmt::Display for WriteRejected {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.reason {
            RejectReason::NotSignedIn => write!(
                f,
                "Please sign in to {} {}",
                self.op.verb(),
                self.kind.plural()
            ),
            RejectReason::FallbackMode => write!(
                f,
                "Cannot {} {} in demo mode. Please configure the database.",
                self.op.verb(),
                self.kind.plural()
            ),
            RejectReason::Invalid(msg) => write!(f, "Invalid {}: {}", self.kind.singular(), msg),
            RejectReason::Store(StoreError::PermissionDenied(_)) => write!(
                f,
                "Database permissions not configured. Cannot {} {}.",
                self.op.verb(),
                self.kind.singular()
            ),
            RejectReason::Store(_) => match self.op {
                WriteOp::Delete => write!(f, "Failed to delete {}", self.kind.singular()),
                _ => write!(f, "Failed to save {}", self.kind.singular()),
            },
        }
    }
}

impl std::error::Error for WriteRejected {}

/// "Project added successfully", "Blog post deleted successfully", ...
pub(crate) fn success_text(kind: ContentKind, op: WriteOp) -> String {
    let noun = kind.singular();
    let mut chars = noun.chars();
    let capitalized = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
        None => String::new(),
    };
    format!("{} {} successfully", capitalized, op.past())
}

/// The notice a successful write leaves, for pages that show it after a
/// redirect.
pub fn success_notice(kind: ContentKind, op: WriteOp) -> Notice {
    Notice::success(success_text(kind, op))
}

pub(crate) fn load_warning_text(kind: ContentKind) -> String {
    format!(
        "Failed to load {} from database, showing example data",
        kind.plural()
    )
}

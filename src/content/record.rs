// src/content/record.rs - Project, Post and ContactMessage documents
use super::{fallback, ContentKind, PostForm, ProjectForm, RecordForm};
use crate::store::{Document, Fields, StoreError, StoreResult};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A record kind the loader can list, create, update and delete.
pub trait ContentRecord: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    const KIND: ContentKind;

    type Form: RecordForm<Record = Self>;

    fn id(&self) -> Option<&str>;
    fn title(&self) -> &str;

    /// Technologies for a project, tags for a post.
    fn labels(&self) -> &[String];

    fn created_at(&self) -> DateTime<Utc>;

    /// The compiled-in example set shown when the store cannot be read.
    fn fallback() -> Vec<Self>;

    fn from_document(doc: Document) -> StoreResult<Self> {
        let Document { id, mut fields } = doc;
        fields.insert("id".to_string(), Value::String(id.clone()));
        serde_json::from_value(Value::Object(fields)).map_err(|e| {
            StoreError::InvalidDocument(format!("{}/{}: {}", Self::KIND.collection(), id, e))
        })
    }

    /// Document fields for a write. The key never travels inside the fields.
    fn to_fields(&self) -> StoreResult<Fields> {
        match serde_json::to_value(self) {
            Ok(Value::Object(mut fields)) => {
                fields.remove("id");
                Ok(fields)
            }
            Ok(other) => Err(StoreError::InvalidDocument(format!(
                "expected an object, got {}",
                other
            ))),
            Err(e) => Err(StoreError::InvalidDocument(e.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub live_url: Option<String>,
    #[serde(default)]
    pub github_url: Option<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
}

impl ContentRecord for Project {
    const KIND: ContentKind = ContentKind::Projects;
    type Form = ProjectForm;

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn labels(&self) -> &[String] {
        &self.technologies
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn fallback() -> Vec<Self> {
        fallback::projects()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
}

impl ContentRecord for Post {
    const KIND: ContentKind = ContentKind::Posts;
    type Form = PostForm;

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn labels(&self) -> &[String] {
        &self.tags
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn fallback() -> Vec<Self> {
        fallback::posts()
    }
}

/// A message left through the contact form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl ContactMessage {
    pub fn to_fields(&self) -> StoreResult<Fields> {
        match serde_json::to_value(self) {
            Ok(Value::Object(fields)) => Ok(fields),
            Ok(_) => Err(StoreError::InvalidDocument("contact message".to_string())),
            Err(e) => Err(StoreError::InvalidDocument(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fields_are_camel_case_without_id() {
        let project = &Project::fallback()[0];
        let fields = project.to_fields().unwrap();
        assert!(fields.contains_key("imageUrl"));
        assert!(fields.contains_key("createdAt"));
        assert!(fields.contains_key("githubUrl"));
        assert!(!fields.contains_key("id"));
        assert!(!fields.contains_key("authorId"));
    }

    #[test]
    fn test_from_document_takes_store_key() {
        let fields = json!({
            "title": "Rust notes",
            "content": "Ownership all the way down",
            "excerpt": "Ownership",
            "author": "Ali",
            "tags": ["rust"],
            "createdAt": "2024-05-01T10:00:00Z",
            "authorId": "u1"
        })
        .as_object()
        .cloned()
        .unwrap();

        let post = Post::from_document(Document {
            id: "k1".into(),
            fields,
        })
        .unwrap();
        assert_eq!(post.id(), Some("k1"));
        assert_eq!(post.labels(), ["rust".to_string()]);
        assert_eq!(post.author_id.as_deref(), Some("u1"));
        assert_eq!(post.created_at.to_rfc3339(), "2024-05-01T10:00:00+00:00");
    }

    #[test]
    fn test_document_without_title_is_invalid() {
        let fields = json!({ "description": "no title" }).as_object().cloned().unwrap();
        let err = Project::from_document(Document {
            id: "bad".into(),
            fields,
        })
        .unwrap_err();
        assert!(matches!(err, StoreError::InvalidDocument(_)));
    }
}

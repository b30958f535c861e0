// src/content/forms.rs - what an editor submits
use super::record::{ContactMessage, Post, Project};
use crate::auth::Actor;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Turns editor input into a record stamped with its author and time.
pub trait RecordForm: DeserializeOwned + Send {
    type Record;

    fn validate(&self) -> Result<(), String>;

    fn into_record(self, actor: &Actor, now: DateTime<Utc>) -> Self::Record;
}

/// Splits a comma-separated label field. Entries are trimmed, empty ones
/// dropped; order and duplicates are kept.
pub fn normalize_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(String::from)
        .collect()
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn require(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{} is required", field))
    } else {
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectForm {
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub technologies: String,
    pub live_url: String,
    pub github_url: String,
}

impl RecordForm for ProjectForm {
    type Record = Project;

    fn validate(&self) -> Result<(), String> {
        require("title", &self.title)?;
        require("description", &self.description)
    }

    fn into_record(self, actor: &Actor, now: DateTime<Utc>) -> Project {
        Project {
            id: None,
            technologies: normalize_tags(&self.technologies),
            live_url: non_empty(&self.live_url),
            github_url: non_empty(&self.github_url),
            title: self.title,
            description: self.description,
            image_url: self.image_url,
            created_at: now,
            author_id: Some(actor.id.clone()),
            author_name: Some(actor.label().to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PostForm {
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub author: String,
    pub tags: String,
}

impl RecordForm for PostForm {
    type Record = Post;

    fn validate(&self) -> Result<(), String> {
        require("title", &self.title)?;
        require("content", &self.content)
    }

    fn into_record(self, actor: &Actor, now: DateTime<Utc>) -> Post {
        Post {
            id: None,
            tags: normalize_tags(&self.tags),
            author: non_empty(&self.author).unwrap_or_else(|| actor.label().to_string()),
            title: self.title,
            content: self.content,
            excerpt: self.excerpt,
            created_at: now,
            author_id: Some(actor.id.clone()),
            author_name: Some(actor.label().to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactForm {
    pub fn validate(&self) -> Result<(), String> {
        require("name", &self.name)?;
        require("email", &self.email)?;
        if !self.email.contains('@') {
            return Err("email is not valid".to_string());
        }
        require("message", &self.message)
    }

    pub fn into_message(self, now: DateTime<Utc>) -> ContactMessage {
        ContactMessage {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            message: self.message.trim().to_string(),
            created_at: now,
        }
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use std::collections::HashMap;

use crate::middleware::validate::{FieldErrors, Validate};

/// Store-assigned story identifier
pub type StoryId = i32;

/// Longest title accepted on create or update
pub const MAX_TITLE_LEN: usize = 255;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Story {
    pub id: StoryId,
    pub title: String,
    pub content: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create payload, accepted once the create schema passes
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewStory {
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
}

/// Update payload. Absent fields are left untouched by the store; an explicit
/// `"content": null` clears the content.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoryChanges {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub content: Option<Option<String>>,
}

/// Marks a field as present, keeping a JSON null as `Some(None)`
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl StoryChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }
}

fn check_title(title: &str, errors: &mut FieldErrors) {
    if title.trim().is_empty() {
        errors.insert("title".to_string(), "Title must not be blank".to_string());
    } else if title.chars().count() > MAX_TITLE_LEN {
        errors.insert(
            "title".to_string(),
            format!("Title must be at most {} characters", MAX_TITLE_LEN),
        );
    }
}

impl Validate for NewStory {
    const SCHEMA: &'static str = "story create";

    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = HashMap::new();
        check_title(&self.title, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl Validate for StoryChanges {
    const SCHEMA: &'static str = "story update";

    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = HashMap::new();

        if self.is_empty() {
            errors.insert(
                "body".to_string(),
                "At least one of 'title' or 'content' is required".to_string(),
            );
        }
        if let Some(title) = &self.title {
            check_title(title, &mut errors);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

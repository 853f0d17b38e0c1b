//! Story persistence boundary.
//!
//! Handlers talk to storage only through [`StoryStore`]. Every failure crossing
//! this boundary is flattened into a [`StoreError`] carrying a human readable
//! message; nothing else about the underlying cause is exposed.

use async_trait::async_trait;
use thiserror::Error;

use crate::database::models::{NewStory, Story, StoryChanges, StoryId};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStoryStore;
pub use postgres::PgStoryStore;

/// Failure reported by a story store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct StoreError {
    pub message: String,
}

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::new(err.to_string())
    }
}

/// CRUD primitives over persisted stories.
///
/// Ids arrive exactly as the caller supplied them in the path. An id the store
/// cannot interpret matches no rows.
#[async_trait]
pub trait StoryStore: Send + Sync {
    /// All stories, ordered by id
    async fn get_all(&self) -> Result<Vec<Story>, StoreError>;

    /// Rows matching `id`; zero or one element
    async fn get_by_id(&self, id: &str) -> Result<Vec<Story>, StoreError>;

    /// Insert a story and return the id the store assigned
    async fn add(&self, story: NewStory) -> Result<StoryId, StoreError>;

    /// Apply `changes` to the story with `id`, returning the affected row count
    async fn update(&self, id: &str, changes: StoryChanges) -> Result<u64, StoreError>;

    /// Delete the story with `id`, returning the affected row count
    async fn remove(&self, id: &str) -> Result<u64, StoreError>;

    /// Connectivity check used by the health endpoint
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Interpret a path id as a story id. Surrounding whitespace is not trimmed.
pub fn parse_story_id(raw: &str) -> Option<StoryId> {
    raw.parse::<StoryId>().ok()
}

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{parse_story_id, StoreError, StoryStore};
use crate::database::models::{NewStory, Story, StoryChanges, StoryId};

/// Process-local story store. Ids start at 1 and are never reused.
#[derive(Debug)]
pub struct MemoryStoryStore {
    state: RwLock<MemoryState>,
}

#[derive(Debug)]
struct MemoryState {
    stories: BTreeMap<StoryId, Story>,
    next_id: StoryId,
}

impl MemoryStoryStore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(MemoryState {
                stories: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.stories.len()
    }
}

impl Default for MemoryStoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StoryStore for MemoryStoryStore {
    async fn get_all(&self) -> Result<Vec<Story>, StoreError> {
        let state = self.state.read().await;
        Ok(state.stories.values().cloned().collect())
    }

    async fn get_by_id(&self, id: &str) -> Result<Vec<Story>, StoreError> {
        let state = self.state.read().await;
        Ok(parse_story_id(id)
            .and_then(|id| state.stories.get(&id))
            .cloned()
            .into_iter()
            .collect())
    }

    async fn add(&self, story: NewStory) -> Result<StoryId, StoreError> {
        let mut state = self.state.write().await;
        let id = state.next_id;
        state.next_id = id
            .checked_add(1)
            .ok_or_else(|| StoreError::new("story id sequence exhausted"))?;

        let now = Utc::now();
        state.stories.insert(
            id,
            Story {
                id,
                title: story.title,
                content: story.content,
                created_at: now,
                updated_at: now,
            },
        );
        Ok(id)
    }

    async fn update(&self, id: &str, changes: StoryChanges) -> Result<u64, StoreError> {
        let Some(id) = parse_story_id(id) else {
            return Ok(0);
        };
        let mut state = self.state.write().await;
        let Some(story) = state.stories.get_mut(&id) else {
            return Ok(0);
        };

        if let Some(title) = changes.title {
            story.title = title;
        }
        if let Some(content) = changes.content {
            story.content = content;
        }
        story.updated_at = Utc::now();
        Ok(1)
    }

    async fn remove(&self, id: &str) -> Result<u64, StoreError> {
        let mut state = self.state.write().await;
        let removed = parse_story_id(id).and_then(|id| state.stories.remove(&id));
        Ok(removed.map_or(0, |_| 1))
    }
}

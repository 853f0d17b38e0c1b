use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::debug;

use super::{parse_story_id, StoreError, StoryStore};
use crate::database::models::{NewStory, Story, StoryChanges, StoryId};

const STORY_COLUMNS: &str = "id, title, content, created_at, updated_at";

/// Story store backed by the `stories` table
#[derive(Clone)]
pub struct PgStoryStore {
    pool: PgPool,
}

impl PgStoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StoryStore for PgStoryStore {
    async fn get_all(&self) -> Result<Vec<Story>, StoreError> {
        let sql = format!("SELECT {} FROM stories ORDER BY id", STORY_COLUMNS);
        let rows = sqlx::query_as::<_, Story>(&sql).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn get_by_id(&self, id: &str) -> Result<Vec<Story>, StoreError> {
        let Some(id) = parse_story_id(id) else {
            debug!("Story id '{}' is not an integer, matching nothing", id);
            return Ok(Vec::new());
        };

        let sql = format!("SELECT {} FROM stories WHERE id = $1", STORY_COLUMNS);
        let rows = sqlx::query_as::<_, Story>(&sql)
            .bind(id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn add(&self, story: NewStory) -> Result<StoryId, StoreError> {
        let id: StoryId = sqlx::query_scalar(
            "INSERT INTO stories (title, content) VALUES ($1, $2) RETURNING id",
        )
        .bind(story.title)
        .bind(story.content)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    async fn update(&self, id: &str, changes: StoryChanges) -> Result<u64, StoreError> {
        let Some(id) = parse_story_id(id) else {
            return Ok(0);
        };

        let mut query = QueryBuilder::<Postgres>::new("UPDATE stories SET updated_at = NOW()");
        if let Some(title) = changes.title {
            query.push(", title = ").push_bind(title);
        }
        if let Some(content) = changes.content {
            query.push(", content = ").push_bind(content);
        }
        query.push(" WHERE id = ").push_bind(id);

        let result = query.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn remove(&self, id: &str) -> Result<u64, StoreError> {
        let Some(id) = parse_story_id(id) else {
            return Ok(0);
        };

        let result = sqlx::query("DELETE FROM stories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

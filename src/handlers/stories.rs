//! Story routes: `/api/stories` and `/api/stories/:id`.
//!
//! Every operation is one store call followed by a pure mapping from the store
//! outcome to a response:
//!
//! | Route               | Success           | Nothing matched | Store failure |
//! |---------------------|-------------------|-----------------|---------------|
//! | `GET /`             | 200 `[story..]`   |                 | 500 `{message}` |
//! | `GET /:id`          | 200 `story`       | 404             | 500 `{message}` |
//! | `POST /`            | 201 `{"ID": n}`   |                 | 500 `{message}` |
//! | `PUT /:id`          | 204               | 404             | 500 `{message}` |
//! | `DELETE /:id`       | 204               | 404             | 500 `{message}` |
//!
//! A 404 always carries `{"error":"StoryNotFound"}`, whether the id never
//! existed or an update/delete simply touched zero rows.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::database::models::{NewStory, Story, StoryChanges, StoryId};
use crate::database::store::{StoreError, StoryStore};
use crate::error::ApiError;
use crate::middleware::{jwt_auth_middleware, AuthGate, Validated};

/// Body of a 201 from `POST /`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Created {
    #[serde(rename = "ID")]
    pub id: StoryId,
}

/// Request handler for the story resource, built once at startup
#[derive(Clone)]
pub struct StoryHandler {
    store: Arc<dyn StoryStore>,
}

impl StoryHandler {
    pub fn new(store: Arc<dyn StoryStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Json<Vec<Story>>, ApiError> {
        list_outcome(self.store.get_all().await)
    }

    pub async fn get(&self, id: &str) -> Result<Json<Story>, ApiError> {
        get_outcome(id, self.store.get_by_id(id).await)
    }

    pub async fn create(&self, story: NewStory) -> Result<(StatusCode, Json<Created>), ApiError> {
        create_outcome(self.store.add(story).await)
    }

    pub async fn update(&self, id: &str, changes: StoryChanges) -> Result<StatusCode, ApiError> {
        write_outcome("update", id, self.store.update(id, changes).await)
    }

    pub async fn delete(&self, id: &str) -> Result<StatusCode, ApiError> {
        write_outcome("delete", id, self.store.remove(id).await)
    }
}

fn store_failure(operation: &str, err: StoreError) -> ApiError {
    error!("Story {} failed: {}", operation, err);
    err.into()
}

/// 200 with every story, or 500
pub fn list_outcome(outcome: Result<Vec<Story>, StoreError>) -> Result<Json<Vec<Story>>, ApiError> {
    outcome.map(Json).map_err(|e| store_failure("list", e))
}

/// 200 with the first matching row, 404 when none matched, or 500
pub fn get_outcome(id: &str, outcome: Result<Vec<Story>, StoreError>) -> Result<Json<Story>, ApiError> {
    let rows = outcome.map_err(|e| store_failure("get", e))?;

    match rows.into_iter().next() {
        Some(story) => Ok(Json(story)),
        None => {
            debug!("Story '{}' not found", id);
            Err(ApiError::StoryNotFound)
        }
    }
}

/// 201 with the store-assigned id, or 500
pub fn create_outcome(outcome: Result<StoryId, StoreError>) -> Result<(StatusCode, Json<Created>), ApiError> {
    let id = outcome.map_err(|e| store_failure("create", e))?;
    info!("Created story {}", id);
    Ok((StatusCode::CREATED, Json(Created { id })))
}

/// 204 when any row was affected, 404 when none were, or 500
pub fn write_outcome(operation: &str, id: &str, outcome: Result<u64, StoreError>) -> Result<StatusCode, ApiError> {
    match outcome.map_err(|e| store_failure(operation, e))? {
        0 => {
            debug!("Story {} matched no rows for '{}'", operation, id);
            Err(ApiError::StoryNotFound)
        }
        _ => Ok(StatusCode::NO_CONTENT),
    }
}

/// GET /api/stories
pub async fn list(State(handler): State<StoryHandler>) -> Result<Json<Vec<Story>>, ApiError> {
    handler.list().await
}

/// GET /api/stories/:id
pub async fn show(
    State(handler): State<StoryHandler>,
    Path(id): Path<String>,
) -> Result<Json<Story>, ApiError> {
    handler.get(&id).await
}

/// POST /api/stories
pub async fn create(
    State(handler): State<StoryHandler>,
    Validated(story): Validated<NewStory>,
) -> Result<(StatusCode, Json<Created>), ApiError> {
    handler.create(story).await
}

/// PUT /api/stories/:id
pub async fn update(
    State(handler): State<StoryHandler>,
    Path(id): Path<String>,
    Validated(changes): Validated<StoryChanges>,
) -> Result<StatusCode, ApiError> {
    handler.update(&id, changes).await
}

/// DELETE /api/stories/:id
pub async fn delete(
    State(handler): State<StoryHandler>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    handler.delete(&id).await
}

/// Story routes relative to the resource root, all behind the auth gate
pub fn router(handler: StoryHandler, gate: AuthGate) -> Router {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(show).put(update).delete(delete))
        .route_layer(from_fn_with_state(gate, jwt_auth_middleware))
        .with_state(handler)
}

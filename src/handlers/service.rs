use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, routing::get, Router};
use serde_json::{json, Value};

use crate::database::store::StoryStore;
use crate::middleware::Envelope;

/// Public service routes: `/` and `/health`
pub fn router(store: Arc<dyn StoryStore>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .with_state(store)
}

async fn root() -> Envelope<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Envelope::success(json!({
        "name": "Story API",
        "version": version,
        "description": "Authenticated CRUD API for stories",
        "endpoints": {
            "home": "/ (public)",
            "health": "/health (public)",
            "stories": "/api/stories[/:id] (protected - Bearer JWT)",
        }
    }))
}

async fn health(State(store): State<Arc<dyn StoryStore>>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match store.ping().await {
        Ok(()) => Envelope::success(json!({
            "status": "ok",
            "timestamp": now,
            "database": "ok"
        })),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            Envelope::degraded(json!({
                "status": "degraded",
                "timestamp": now,
                "database_error": e.message
            }))
        }
    }
}

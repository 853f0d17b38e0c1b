use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use crate::config::{AppConfig, StorageBackend};
use crate::database::{DatabaseManager, MemoryStoryStore, PgStoryStore, StoryStore};
use crate::handlers::{service, stories, StoryHandler};
use crate::middleware::AuthGate;

/// Mount point of the story resource
pub const STORIES_ROOT: &str = "/api/stories";

/// Assemble the full router around an already opened store
pub fn app(store: Arc<dyn StoryStore>, config: &AppConfig) -> Router {
    let handler = StoryHandler::new(store.clone());
    let gate = AuthGate::new(config.security.jwt_secret.as_str());

    let mut app = Router::new()
        .merge(service::router(store))
        .nest(STORIES_ROOT, stories::router(handler, gate))
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes));

    if config.security.enable_cors {
        app = app.layer(cors_layer(&config.security.cors_origins));
    }
    if config.api.enable_request_logging {
        app = app.layer(TraceLayer::new_for_http());
    }

    app
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", o);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any)
}

/// Open the configured store, running migrations for PostgreSQL
pub async fn open_store(config: &AppConfig) -> anyhow::Result<Arc<dyn StoryStore>> {
    match config.storage {
        StorageBackend::Postgres => {
            let pool = DatabaseManager::connect(&config.database)
                .await
                .context("failed to connect to database")?;
            DatabaseManager::migrate(&pool).await?;
            let store: Arc<dyn StoryStore> = Arc::new(PgStoryStore::new(pool));
            Ok(store)
        }
        StorageBackend::Memory => {
            info!("Using in-memory story store; data is lost on shutdown");
            let store: Arc<dyn StoryStore> = Arc::new(MemoryStoryStore::new());
            Ok(store)
        }
    }
}

/// Bind and serve until the process receives ctrl-c
pub async fn serve(config: &AppConfig) -> anyhow::Result<()> {
    if config.security.jwt_secret.is_empty() {
        anyhow::bail!("JWT_SECRET must be set; every story route requires a bearer token");
    }

    let store = open_store(config).await?;
    let app = app(store, config);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    info!("Story API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Story API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}

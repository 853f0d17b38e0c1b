#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::{RequestBuilder, StatusCode};
use serde_json::{json, Value};

use story_api::auth::{generate_jwt, Claims};
use story_api::config::{AppConfig, StorageBackend};
use story_api::database::{MemoryStoryStore, StoryStore};

pub const SECRET: &str = "integration-test-secret";

/// A story API bound to a free local port for the duration of one test
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub client: reqwest::Client,
    token: String,
}

impl TestServer {
    /// Serve over a fresh in-memory store
    pub async fn spawn() -> Result<Self> {
        Self::spawn_with(Arc::new(MemoryStoryStore::new())).await
    }

    pub async fn spawn_with(store: Arc<dyn StoryStore>) -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let mut config = AppConfig::from_env();
        config.storage = StorageBackend::Memory;
        config.security.jwt_secret = SECRET.to_string();

        let app = story_api::app::app(store, &config);
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test listener")?;
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("test server stopped: {}", e);
            }
        });

        let token = generate_jwt(&Claims::new("integration", 1)?, SECRET)?;
        let server = Self { port, base_url, client: reqwest::Client::new(), token };
        server.wait_ready(Duration::from_secs(5)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            // A degraded store still means the server is accepting requests
            if let Ok(resp) = self.client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK || resp.status() == StatusCode::SERVICE_UNAVAILABLE {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn stories(&self, suffix: &str) -> String {
        self.url(&format!("/api/stories{}", suffix))
    }

    pub fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.bearer_auth(&self.token)
    }

    /// POST a story and return the id from the 201 body
    pub async fn create_story(&self, title: &str) -> Result<i64> {
        let res = self
            .authed(self.client.post(self.stories("")))
            .json(&json!({ "title": title }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::CREATED, "create failed: {}", res.status());

        let body = res.json::<Value>().await?;
        body["ID"].as_i64().context("missing ID in create response")
    }

    pub async fn get_story(&self, id: &str) -> Result<(StatusCode, Value)> {
        let res = self.authed(self.client.get(self.stories(&format!("/{}", id)))).send().await?;
        let status = res.status();
        Ok((status, res.json::<Value>().await?))
    }
}

use clap::Args;

use crate::config::{AppConfig, StorageBackend};

#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    #[arg(long, help = "Port to listen on (overrides PORT)")]
    pub port: Option<u16>,

    #[arg(long, help = "Use the in-memory store instead of PostgreSQL")]
    pub memory: bool,
}

impl ServeArgs {
    fn apply(self, mut config: AppConfig) -> AppConfig {
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if self.memory {
            config.storage = StorageBackend::Memory;
        }
        config
    }
}

pub async fn handle(args: ServeArgs, config: AppConfig) -> anyhow::Result<()> {
    let config = args.apply(config);
    tracing::info!(
        "Starting Story API in {:?} mode with {:?} storage",
        config.environment,
        config.storage
    );
    crate::app::serve(&config).await
}

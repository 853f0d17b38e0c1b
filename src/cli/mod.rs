pub mod commands;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;

#[derive(Parser)]
#[command(name = "story-api")]
#[command(about = "Story API - authenticated CRUD service for stories")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve(commands::serve::ServeArgs),

    #[command(about = "Mint a bearer token signed with the configured JWT secret")]
    Token(commands::token::TokenArgs),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli, config: AppConfig) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        None => commands::serve::handle(Default::default(), config).await,
        Some(Commands::Serve(args)) => commands::serve::handle(args, config).await,
        Some(Commands::Token(args)) => commands::token::handle(args, &config, output_format),
    }
}

use anyhow::Context;
use clap::Args;
use serde_json::json;

use crate::auth::{generate_jwt, Claims};
use crate::cli::OutputFormat;
use crate::config::AppConfig;

#[derive(Args, Debug)]
pub struct TokenArgs {
    #[arg(long, help = "Subject recorded in the token")]
    pub subject: String,

    #[arg(long, help = "Lifetime in hours (defaults to SECURITY_JWT_EXPIRY_HOURS)")]
    pub hours: Option<u64>,
}

pub fn handle(args: TokenArgs, config: &AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    let hours = args.hours.unwrap_or(config.security.jwt_expiry_hours);
    let claims = Claims::new(args.subject, hours).context("invalid token lifetime")?;
    let token = generate_jwt(&claims, &config.security.jwt_secret).context("failed to sign token")?;

    match output_format {
        OutputFormat::Json => println!(
            "{}",
            json!({ "token": token, "subject": claims.sub, "expires_at": claims.exp })
        ),
        OutputFormat::Text => println!("{}", token),
    }
    Ok(())
}

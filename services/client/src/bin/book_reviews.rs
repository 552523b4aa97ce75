//! services/client/src/bin/book_reviews.rs

use clap::Parser;
use client_lib::{
    cli::{dispatch, state::AppState, Cli, Outcome},
    config::Config,
    error::ClientError,
};
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), ClientError> {
    let cli = Cli::parse();

    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    debug!(api = %config.api_base_url, session_file = %config.session_file.display(), "Configuration loaded");

    // --- 2. Open the Session Store & Build the Gateway ---
    let state = AppState::new(config)?;

    // --- 3. Run the Command ---
    let mut stdout = std::io::stdout();
    let outcome = dispatch(&state, cli.command, &mut stdout).await?;
    if outcome == Outcome::Failed {
        std::process::exit(1);
    }
    Ok(())
}

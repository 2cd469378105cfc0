//! reviewbell CLI
//!
//! Long-running homework review notifier. Secrets come from the process
//! environment (after an optional `.env`); tuning comes from a TOML file.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use reviewbell::{
    error::Result,
    logging,
    models::{Config, Secrets},
    pipeline,
    services::{Notifier, ReviewClient},
};

/// reviewbell - homework review status notifier
#[derive(Parser, Debug)]
#[command(
    name = "reviewbell",
    version,
    about = "Polls homework review statuses and rings a Telegram chat on verdicts"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "reviewbell.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the poll loop until the process is terminated
    Run,

    /// Run a single poll iteration and exit
    Once,

    /// Validate configuration and credentials, then exit
    Validate,
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    // Logging setup needs the config, so a load failure is logged after init.
    let (config, config_error) = match Config::load(&cli.config) {
        Ok(config) => (config, None),
        Err(error) => (Config::default(), Some(error)),
    };
    let _guard = logging::init(&config.logging, cli.verbose);
    if let Some(error) = config_error {
        tracing::warn!(
            "Config load failed from {:?}: {}. Using defaults.",
            cli.config,
            error
        );
    }

    tracing::info!("reviewbell starting...");
    config.validate()?;

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => {
            let (review, sink) = build_services(&config)?;
            pipeline::run_poller(&config, &review, &sink).await;
        }

        Command::Once => {
            let (review, sink) = build_services(&config)?;
            let mut cursor = chrono::Utc::now().timestamp();
            let outcome = pipeline::poll_once(&mut cursor, &review, &sink).await?;
            tracing::info!("single iteration finished: {outcome:?}, cursor {cursor}");
        }

        Command::Validate => {
            Secrets::from_env()?;
            tracing::info!("✓ Config OK, all required secrets present");
        }
    }

    Ok(())
}

/// Construct the two network collaborators from config and secrets.
fn build_services(config: &Config) -> Result<(ReviewClient, Notifier)> {
    let secrets = Secrets::from_env()?;
    let review = ReviewClient::new(config.review.clone(), secrets.review_token)?;
    let sink = Notifier::new(
        config.telegram.clone(),
        secrets.telegram_token,
        secrets.chat_id,
    )?;
    Ok((review, sink))
}

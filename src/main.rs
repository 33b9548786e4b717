//! Kurs CLI entry point.

use anyhow::{Context, Result};
use clap::Parser;
use kurs::cli::{commands, Cli, Commands};
use kurs::config::Settings;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config_path = cli
        .config
        .as_deref()
        .map(Settings::expand_path)
        .unwrap_or_else(Settings::default_config_path);
    let settings = Settings::load_from(Some(&config_path))?;

    // Initialize logging
    let log_level = match cli.verbose {
        0 => settings.general.log_level.clone(),
        1 => "info".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("kurs={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
    let result = runtime.block_on(execute(cli.command, settings, config_path));
    // A blocking stdin read left behind by Ctrl-C at the prompt cannot be
    // cancelled, so don't wait for it.
    runtime.shutdown_background();
    result
}

async fn execute(command: Commands, settings: Settings, config_path: PathBuf) -> Result<()> {
    match command {
        Commands::Run { file } => {
            commands::run_process(file, settings).await?;
        }

        Commands::Structure { transcript } => {
            commands::run_structure(&transcript, settings).await?;
        }

        Commands::Chat { doc } => {
            commands::run_chat(&doc, settings).await?;
        }

        Commands::Config { action } => {
            commands::run_config(&action, &settings, &config_path)?;
        }
    }

    Ok(())
}

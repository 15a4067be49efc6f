//! DocVault: archive and folder tree manager.
//!
//! Entry point: loads configuration, sets up logging, wires the HTTP
//! document API into the CLI and runs the requested command.

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use docvault_cli::Cli;
use docvault_cli::output;
use docvault_core::config::AppConfig;
use docvault_core::result::AppResult;
use docvault_storage::providers::HttpDocumentApi;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match AppConfig::load(&cli.config, &cli.env) {
        Ok(c) => c,
        Err(e) => {
            output::print_error(&format!("Failed to load configuration: {e}"));
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(&cli, &config).await {
        tracing::debug!(kind = ?e.kind, status = ?e.status, "Command failed");
        output::print_error(&e.to_string());
        std::process::exit(1);
    }
}

/// Initialize tracing/logging. Log lines go to stderr so table and JSON
/// output on stdout stays clean.
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

async fn run(cli: &Cli, config: &AppConfig) -> AppResult<()> {
    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        api = %config.api.base_url,
        forest = %cli.forest.display(),
        "Starting DocVault"
    );
    let api = Arc::new(HttpDocumentApi::new(&config.api)?);
    cli.execute(config, api).await
}

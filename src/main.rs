use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Parser;
use tracing::{info, warn};

use skycast::cli::{Cli, Command};
use skycast::config::{FetchConfig, ServeConfig};
use skycast::{fetch, store, web};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Fetch { config, out } => run_fetch(config, out).await,
        Command::Serve { config } => run_serve(config).await,
    }
}

async fn run_fetch(config_path: Option<PathBuf>, out: Option<PathBuf>) -> Result<()> {
    let config = FetchConfig::load_from_path(config_path)?;
    config.logging.init();

    let (document, summary) = fetch::run(&config).await?;

    if summary.succeeded == 0 {
        bail!(
            "no city could be fetched ({} failed); check the API key and network",
            summary.failed
        );
    }
    if summary.failed > 0 {
        warn!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            "fetch completed with partial results"
        );
    }

    match out.or_else(|| config.output_path.clone()) {
        Some(path) => {
            store::write_atomic(&document, &path)?;
            info!(
                path = %path.display(),
                cities = document.cities.len(),
                "weather document written"
            );
        }
        None => println!("{}", serde_json::to_string_pretty(&document)?),
    }

    Ok(())
}

async fn run_serve(config_path: Option<PathBuf>) -> Result<()> {
    let config = ServeConfig::load_from_path(config_path)?;
    config.logging.init();
    web::run(config).await
}

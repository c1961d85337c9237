//! Command-line interface definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// City weather fetcher and dashboard publisher
#[derive(Parser, Debug)]
#[command(name = "skycast", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch weather for the configured cities and write the JSON document
    Fetch {
        /// Path to the fetcher config. Search order if not given:
        /// $SKYCAST_CONFIG, ./config/fetch.toml, ./fetch.toml,
        /// <config dir>/skycast/fetch.toml
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write the document here instead of the configured output path.
        /// With neither set, the JSON is printed to stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Serve the HTML dashboard from the fetched document
    Serve {
        /// Path to the publisher config. Search order if not given:
        /// $SKYCAST_CONFIG, ./config/serve.toml, ./serve.toml,
        /// <config dir>/skycast/serve.toml
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_fetch_with_flags() {
        let cli = Cli::parse_from([
            "skycast",
            "fetch",
            "--config",
            "fetch.toml",
            "--out",
            "weather.json",
        ]);
        match cli.command {
            Command::Fetch { config, out } => {
                assert_eq!(config, Some(PathBuf::from("fetch.toml")));
                assert_eq!(out, Some(PathBuf::from("weather.json")));
            }
            Command::Serve { .. } => panic!("expected fetch subcommand"),
        }
    }

    #[test]
    fn test_parse_serve_defaults() {
        let cli = Cli::parse_from(["skycast", "serve"]);
        match cli.command {
            Command::Serve { config } => assert!(config.is_none()),
            Command::Fetch { .. } => panic!("expected serve subcommand"),
        }
    }
}

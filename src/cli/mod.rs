//! CLI module for listsync
//!
//! Command-line interface definitions and handlers for the reconciliation
//! tool.
//!
//! # Commands
//!
//! - `run` - Reconcile a CSV export against the remote list
//! - `config` - Configuration utilities (init)
//!
//! # Example
//!
//! ```bash
//! # Reconcile an inventory export
//! listsync run --csv inventory.csv --config listsync.toml
//!
//! # Audit-only run with JSON output
//! listsync run --csv inventory.csv --json
//!
//! # Write a starter configuration file
//! listsync config init
//! ```

pub mod config;
pub mod output;
pub mod run;

pub use config::handle_config_init;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Listsync - CSV-to-remote-list reconciliation
#[derive(Parser, Debug)]
#[command(
    name = "listsync",
    version,
    about = "Reconciles a CSV inventory export against a remote hosted list"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a reconciliation batch
    Run(RunArgs),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Path to the CSV export to reconcile
    #[arg(long)]
    pub csv: PathBuf,

    /// Path to configuration file
    #[arg(short, long, default_value = "listsync.toml")]
    pub config: PathBuf,

    /// Override the remote site URL
    #[arg(long, env = "LISTSYNC_SITE_URL")]
    pub site_url: Option<String>,

    /// Override the remote list name
    #[arg(long, env = "LISTSYNC_LIST_NAME")]
    pub list_name: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "LISTSYNC_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Bearer token for the remote site
    #[arg(long, env = "LISTSYNC_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Print the run summary as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Initialize a new configuration file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output file path
    #[arg(short, long, default_value = "listsync.toml")]
    pub output: PathBuf,

    /// Overwrite existing file
    #[arg(short, long)]
    pub force: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_parse_run_defaults() {
        let cli = Cli::try_parse_from(["listsync", "run", "--csv", "inventory.csv"]).unwrap();
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.csv, PathBuf::from("inventory.csv"));
                assert_eq!(args.config, PathBuf::from("listsync.toml"));
                assert!(!args.json);
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_cli_parse_run_requires_csv() {
        assert!(Cli::try_parse_from(["listsync", "run"]).is_err());
    }

    #[test]
    fn test_cli_parse_run_with_overrides() {
        let cli = Cli::try_parse_from([
            "listsync",
            "run",
            "--csv",
            "x.csv",
            "-c",
            "custom.toml",
            "--site-url",
            "https://lists.example.com",
            "--json",
        ])
        .unwrap();
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.config, PathBuf::from("custom.toml"));
                assert_eq!(args.site_url.as_deref(), Some("https://lists.example.com"));
                assert!(args.json);
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_cli_parse_config_init() {
        let cli = Cli::try_parse_from(["listsync", "config", "init"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Config(ConfigCommands::Init(_))
        ));
    }
}

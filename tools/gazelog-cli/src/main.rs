//! gazelog CLI: record gaze sessions and ship their artifacts.
//!
//! Usage:
//!   gazelog record [OPTIONS]   Record a session from a landmark stream
//!   gazelog upload             Archive and upload existing artifacts
//!   gazelog info               Show artifact status and endpoints

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use gazelog_common::config::{config_file_path, AppConfig};

mod commands;
mod signals;

#[derive(Parser)]
#[command(
    name = "gazelog",
    about = "Webcam gaze session recorder for research studies",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to $XDG_CONFIG_HOME/gazelog/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a session, then archive and upload it
    Record {
        /// JSON Lines landmark stream (reads stdin when omitted)
        #[arg(short, long)]
        landmarks: Option<PathBuf>,

        /// Gaze log path
        #[arg(long)]
        log_file: Option<PathBuf>,

        /// Screenshot directory
        #[arg(long)]
        screenshots_dir: Option<PathBuf>,

        /// Archive path
        #[arg(long)]
        archive_file: Option<PathBuf>,

        /// Do not capture periodic screenshots
        #[arg(long)]
        no_screenshots: bool,
    },

    /// Archive and upload artifacts left by an earlier session
    Upload,

    /// Show artifact status and configured endpoints
    Info,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(run(cli));
    // A blocked stdin read cannot be cancelled; do not wait for it.
    runtime.shutdown_background();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = cli.config.clone().unwrap_or_else(config_file_path);
    let mut config = AppConfig::load_from(&config_path);
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    gazelog_common::logging::init_logging(&config.logging);

    match cli.command {
        Commands::Record {
            landmarks,
            log_file,
            screenshots_dir,
            archive_file,
            no_screenshots,
        } => {
            if let Some(path) = log_file {
                config.artifacts.log_file = path;
            }
            if let Some(path) = screenshots_dir {
                config.artifacts.screenshots_dir = path;
            }
            if let Some(path) = archive_file {
                config.artifacts.archive_file = path;
            }
            commands::record::run(config, landmarks, !no_screenshots).await
        }
        Commands::Upload => commands::upload::run(config).await,
        Commands::Info => commands::info::run(config, config_path),
    }
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
    fn test_record_flags() {
        let cli = Cli::try_parse_from([
            "gazelog",
            "--verbose",
            "record",
            "--landmarks",
            "frames.jsonl",
            "--no-screenshots",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Record {
                landmarks,
                no_screenshots,
                log_file,
                ..
            } => {
                assert_eq!(landmarks, Some(PathBuf::from("frames.jsonl")));
                assert!(no_screenshots);
                assert!(log_file.is_none());
            }
            _ => panic!("expected record"),
        }
    }
}

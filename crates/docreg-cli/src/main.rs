//! docreg CLI - Command-line interface for document registration
//!
//! Provides commands for:
//! - Submitting documents through the rate-limited client
//! - Printing a sample document
//! - Showing and validating the configuration

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use docreg_core::config::Config;
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::{config::ConfigCommand, sample::SampleCommand, submit::SubmitCommand};
use output::OutputFormat;

#[derive(Debug, Parser)]
#[command(
    name = "docreg",
    version,
    about = "Rate-limited client for the document registration API"
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Use alternate config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Submit a document to the registration API
    Submit(SubmitCommand),
    /// Print a sample document
    Sample(SampleCommand),
    /// View and validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    // Logging settings are best effort; commands report load errors themselves
    let logging = Config::load(&config_path).ok().map(|c| c.logging);

    // Setup tracing
    let filter = match (cli.quiet, cli.verbose) {
        (true, _) => "error".to_string(),
        (false, 0) => logging
            .as_ref()
            .map(|l| l.level.clone())
            .unwrap_or_else(|| "info".to_string()),
        (false, 1) => "debug".to_string(),
        (false, _) => "trace".to_string(),
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if logging.as_ref().is_some_and(|l| l.json) {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Human
    };

    match cli.command {
        Commands::Submit(cmd) => cmd.execute(format, &config_path).await,
        Commands::Sample(cmd) => cmd.execute(format).await,
        Commands::Config(cmd) => cmd.execute(format, &config_path).await,
    }
}

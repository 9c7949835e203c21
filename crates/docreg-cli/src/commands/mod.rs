//! CLI subcommands

pub mod config;
pub mod sample;
pub mod submit;

use std::path::Path;

use anyhow::{Context, Result};
use docreg_core::config::Config;

/// Loads the configuration file, failing with the path in the message.
pub fn load_config(path: &Path) -> Result<Config> {
    Config::load(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))
}

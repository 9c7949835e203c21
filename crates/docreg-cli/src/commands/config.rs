//! Config command - View and validate docreg configuration
//!
//! Provides the `docreg config` CLI command which:
//! 1. Shows the current configuration (YAML or JSON)
//! 2. Validates the configuration file and reports errors

use std::path::Path;

use anyhow::{Context, Result};
use clap::Subcommand;
use docreg_core::config::{Config, QuotaConfig};
use tracing::info;

use super::load_config;
use crate::output::{get_formatter, OutputFormat};

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display current configuration
    Show,
    /// Validate configuration file
    Validate,
}

impl ConfigCommand {
    /// Execute the config command
    pub async fn execute(&self, format: OutputFormat, config_path: &Path) -> Result<()> {
        match self {
            ConfigCommand::Show => execute_show(format, config_path),
            ConfigCommand::Validate => execute_validate(format, config_path),
        }
    }
}

fn execute_show(format: OutputFormat, config_path: &Path) -> Result<()> {
    let formatter = get_formatter(format);
    let config = load_config(config_path)?;

    info!(config_path = %config_path.display(), "Showing configuration");

    if format.is_json() {
        let json =
            serde_json::to_value(&config).context("Failed to serialize configuration to JSON")?;
        formatter.print_json(&json);
    } else {
        formatter.success(&format!("Configuration ({})", config_path.display()));
        formatter.info(&format!("Quota: {}", describe_quota(&config.quota)));
        formatter.info("");

        let yaml =
            serde_yaml::to_string(&config).context("Failed to serialize configuration to YAML")?;
        for line in yaml.lines() {
            formatter.info(line);
        }
    }

    Ok(())
}

fn execute_validate(format: OutputFormat, config_path: &Path) -> Result<()> {
    let formatter = get_formatter(format);

    let config = match Config::load(config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            let message = if config_path.exists() {
                format!("Failed to parse configuration: {}", e)
            } else {
                "Configuration file not found".to_string()
            };

            if format.is_json() {
                formatter.print_json(&serde_json::json!({
                    "valid": false,
                    "config_path": config_path.display().to_string(),
                    "errors": [message],
                }));
            } else {
                formatter.error(&message);
                formatter.info(&format!("File: {}", config_path.display()));
            }
            anyhow::bail!("configuration is not usable");
        }
    };

    info!(config_path = %config_path.display(), "Validating configuration");

    let errors = config.validate();

    if format.is_json() {
        let error_strings: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        formatter.print_json(&serde_json::json!({
            "valid": errors.is_empty(),
            "config_path": config_path.display().to_string(),
            "errors": error_strings,
        }));
    } else if errors.is_empty() {
        formatter.success("Configuration is valid");
        formatter.info(&format!("File: {}", config_path.display()));
        formatter.info(&format!("Quota: {}", describe_quota(&config.quota)));
    } else {
        formatter.error(&format!(
            "Configuration has {} error{}:",
            errors.len(),
            if errors.len() == 1 { "" } else { "s" }
        ));
        formatter.info(&format!("File: {}", config_path.display()));
        formatter.info("");
        for error in &errors {
            formatter.info(&format!("  {} - {}", error.field, error.message));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        anyhow::bail!("configuration has {} error(s)", errors.len())
    }
}

/// One-line summary of a quota section, e.g. `5 per 1 minutes`.
fn describe_quota(quota: &QuotaConfig) -> String {
    format!("{} per {} {}", quota.max_admissions, quota.count, quota.unit)
}

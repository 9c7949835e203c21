//! Submit command - Send a document through the rate-limited submitter
//!
//! Reads a JSON document from a file (or stdin) and submits it one or more
//! times concurrently. All copies share one submitter, so the configured
//! quota applies across them.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result};
use clap::Args;
use docreg_client::{metrics::SubmitterMetrics, SubmitterBuilder};
use docreg_core::domain::Document;
use tracing::info;

use super::load_config;
use crate::output::{get_formatter, OutputFormat, SubmissionReport};

/// Submit a document to the registration API
#[derive(Debug, Args)]
pub struct SubmitCommand {
    /// Path to the JSON document, or `-` to read from stdin
    document: PathBuf,

    /// Signature sent in the `Signature` header
    #[arg(long)]
    signature: String,

    /// Number of times to submit the document concurrently
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    copies: u32,

    /// Print submitter metrics after all submissions finish
    #[arg(long)]
    metrics: bool,
}

impl SubmitCommand {
    pub async fn execute(&self, format: OutputFormat, config_path: &Path) -> Result<()> {
        let formatter = get_formatter(format);

        let config = load_config(config_path)?;
        let errors = config.validate();
        if !errors.is_empty() {
            for error in &errors {
                formatter.error(&error.to_string());
            }
            anyhow::bail!("configuration has {} error(s)", errors.len());
        }

        let document = Arc::new(read_document(&self.document)?);
        let metrics = Arc::new(SubmitterMetrics::new()?);
        let submitter = Arc::new(
            SubmitterBuilder::from_config(&config)?
                .metrics(Arc::clone(&metrics))
                .build(),
        );

        info!(copies = self.copies, endpoint = %submitter.endpoint(), "Submitting document");

        let handles: Vec<_> = (0..self.copies)
            .map(|_| {
                let submitter = Arc::clone(&submitter);
                let document = Arc::clone(&document);
                let signature = self.signature.clone();
                tokio::spawn(async move { submitter.create_document(&document, &signature).await })
            })
            .collect();

        let mut outcomes = Vec::with_capacity(handles.len());
        for handle in handles {
            outcomes.push(handle.await.context("Submission task panicked")?);
        }
        submitter.shutdown();

        let mut report = SubmissionReport::new(&outcomes);
        if self.metrics {
            report = report.with_metrics(metrics.encode()?);
        }
        formatter.submission_report(&report);

        let failed = report.failed();
        if failed > 0 {
            anyhow::bail!("{} of {} submissions failed", failed, outcomes.len());
        }
        Ok(())
    }
}

/// Reads and parses the document at `path` (`-` for stdin).
fn read_document(path: &Path) -> Result<Document> {
    let text = if path == Path::new("-") {
        std::io::read_to_string(std::io::stdin()).context("Failed to read document from stdin")?
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read document {}", path.display()))?
    };
    serde_json::from_str(&text).context("Document is not valid JSON")
}

//! Terminal output for docreg commands
//!
//! Every command renders through an [`OutputFormatter`] chosen by the global
//! `--json` flag. Submission results are collected into a
//! [`SubmissionReport`] first, so both formatters show the same outcomes in
//! submission order.

use docreg_client::SubmitError;
use docreg_core::domain::SubmissionResponse;

/// Output format selector
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Human,
    Json,
}

impl OutputFormat {
    pub fn is_json(self) -> bool {
        matches!(self, OutputFormat::Json)
    }
}

// ============================================================================
// SubmissionReport
// ============================================================================

/// Outcome of one submitted copy
#[derive(Debug, Clone, PartialEq)]
pub enum CopyOutcome {
    /// The API answered, with any status
    Answered { status: u16, body: String },
    /// Serialization or transport failed
    Failed(String),
}

/// Results of a `docreg submit` run
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionReport {
    /// One entry per copy, in submission order
    pub outcomes: Vec<CopyOutcome>,
    /// Prometheus text exposition, when requested
    pub metrics: Option<String>,
}

impl SubmissionReport {
    pub fn new(outcomes: &[Result<SubmissionResponse, SubmitError>]) -> Self {
        let outcomes = outcomes
            .iter()
            .map(|outcome| match outcome {
                Ok(response) => CopyOutcome::Answered {
                    status: response.status,
                    body: response.body.clone(),
                },
                Err(e) => CopyOutcome::Failed(e.to_string()),
            })
            .collect();
        Self {
            outcomes,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: String) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Copies that got no response from the API
    pub fn failed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, CopyOutcome::Failed(_)))
            .count()
    }

    pub fn to_json(&self) -> serde_json::Value {
        let results: Vec<_> = self
            .outcomes
            .iter()
            .enumerate()
            .map(|(i, outcome)| match outcome {
                CopyOutcome::Answered { status, body } => serde_json::json!({
                    "copy": i + 1,
                    "status": status,
                    "body": body,
                }),
                CopyOutcome::Failed(error) => serde_json::json!({
                    "copy": i + 1,
                    "error": error,
                }),
            })
            .collect();

        let mut json = serde_json::json!({
            "submitted": self.outcomes.len(),
            "failed": self.failed(),
            "results": results,
        });
        if let Some(metrics) = &self.metrics {
            json["metrics"] = serde_json::Value::String(metrics.clone());
        }
        json
    }
}

// ============================================================================
// Formatters
// ============================================================================

/// Trait for formatting CLI output
pub trait OutputFormatter {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
    fn info(&self, message: &str);
    fn print_json(&self, value: &serde_json::Value);
    /// Document payloads are printed as JSON in every format
    fn document(&self, value: &serde_json::Value);
    fn submission_report(&self, report: &SubmissionReport);
}

/// Human-readable output formatter with checkmarks and indentation
pub struct HumanFormatter;

impl OutputFormatter for HumanFormatter {
    fn success(&self, message: &str) {
        println!("\u{2713} {}", message);
    }
    fn error(&self, message: &str) {
        eprintln!("\u{2717} Error: {}", message);
    }
    fn info(&self, message: &str) {
        println!("  {}", message);
    }
    fn print_json(&self, _value: &serde_json::Value) {}
    fn document(&self, value: &serde_json::Value) {
        println!(
            "{}",
            serde_json::to_string_pretty(value).unwrap_or_default()
        );
    }
    fn submission_report(&self, report: &SubmissionReport) {
        for (i, outcome) in report.outcomes.iter().enumerate() {
            match outcome {
                CopyOutcome::Answered { status, body } => {
                    self.success(&format!("Copy {}: HTTP {}", i + 1, status));
                    if !body.is_empty() {
                        self.info(body);
                    }
                }
                CopyOutcome::Failed(error) => self.error(&format!("Copy {}: {}", i + 1, error)),
            }
        }
        if let Some(metrics) = &report.metrics {
            println!();
            print!("{}", metrics);
        }
    }
}

/// JSON output formatter
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn success(&self, message: &str) {
        println!(
            "{}",
            serde_json::json!({"success": true, "message": message})
        );
    }
    fn error(&self, message: &str) {
        eprintln!(
            "{}",
            serde_json::json!({"success": false, "error": message})
        );
    }
    fn info(&self, _message: &str) {}
    fn print_json(&self, value: &serde_json::Value) {
        println!(
            "{}",
            serde_json::to_string_pretty(value).unwrap_or_default()
        );
    }
    fn document(&self, value: &serde_json::Value) {
        self.print_json(value);
    }
    fn submission_report(&self, report: &SubmissionReport) {
        self.print_json(&report.to_json());
    }
}

pub fn get_formatter(format: OutputFormat) -> Box<dyn OutputFormatter> {
    if format.is_json() {
        Box::new(JsonFormatter)
    } else {
        Box::new(HumanFormatter)
    }
}

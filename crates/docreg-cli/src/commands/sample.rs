//! Sample command - Print an example registration document
//!
//! The output is a complete goods introduction document that can be saved
//! and passed to `docreg submit`.

use anyhow::{Context, Result};
use clap::Args;
use docreg_core::domain::{Description, Document, Product};

use crate::output::{get_formatter, OutputFormat};

/// Signature printed alongside the sample document.
pub const SAMPLE_SIGNATURE: &str = "example_signature";

/// Print a sample document as JSON
#[derive(Debug, Args)]
pub struct SampleCommand {}

impl SampleCommand {
    pub async fn execute(&self, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(format);
        let document = sample_document();

        let json = serde_json::to_value(&document).context("Failed to serialize document")?;
        formatter.document(&json);
        if !format.is_json() {
            eprintln!();
            eprintln!("Submit with: docreg submit <FILE> --signature {SAMPLE_SIGNATURE}");
        }

        Ok(())
    }
}

/// Builds a goods introduction document with a single product.
pub fn sample_document() -> Document {
    let placeholder = || Some("string".to_string());
    let date = || Some("2020-01-23".to_string());

    Document {
        description: Some(Description {
            participant_inn: Some("1234567890".to_string()),
        }),
        doc_id: placeholder(),
        doc_status: placeholder(),
        doc_type: Some("LP_INTRODUCE_GOODS".to_string()),
        import_request: true,
        owner_inn: placeholder(),
        participant_inn: placeholder(),
        producer_inn: placeholder(),
        production_date: date(),
        production_type: placeholder(),
        products: vec![Product {
            certificate_document: placeholder(),
            certificate_document_date: date(),
            certificate_document_number: placeholder(),
            owner_inn: placeholder(),
            producer_inn: placeholder(),
            production_date: date(),
            tnved_code: placeholder(),
            uit_code: placeholder(),
            uitu_code: placeholder(),
        }],
        reg_date: date(),
        reg_number: placeholder(),
    }
}

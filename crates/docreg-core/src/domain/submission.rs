//! Submission request and response values

use serde::{Deserialize, Serialize};

use super::document::Document;

/// A document together with the detached signature sent alongside it
///
/// The payload type defaults to [`Document`] but any `Serialize` value can be
/// submitted; the submitter treats it as opaque.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionRequest<D = Document> {
    pub document: D,
    /// Opaque signature value, sent verbatim in the `Signature` header
    pub signature: String,
}

impl<D> SubmissionRequest<D> {
    pub fn new(document: D, signature: impl Into<String>) -> Self {
        Self {
            document,
            signature: signature.into(),
        }
    }
}

/// Status code and body returned by the registration API
///
/// Any status, including 4xx/5xx, is reported here unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionResponse {
    pub status: u16,
    pub body: String,
}

impl SubmissionResponse {
    /// Returns true for 2xx statuses
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

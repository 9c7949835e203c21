//! Registration transport port (driven/secondary port)
//!
//! The submitter builds an [`OutboundRequest`] and hands it to an
//! [`IRegistrationTransport`]. The transport owns connection handling,
//! keep-alive and timeouts; it is shared across concurrent submissions and
//! keeps no per-request state.
//!
//! ## Design Notes
//!
//! - Transport failures are typed so the submitter can report them as a
//!   distinct error kind.
//! - Uses `#[async_trait]` for async trait methods.

use thiserror::Error;

use crate::domain::SubmissionResponse;

/// Header carrying the payload media type
pub const CONTENT_TYPE_HEADER: &str = "Content-Type";

/// Header carrying the caller-supplied document signature
pub const SIGNATURE_HEADER: &str = "Signature";

/// Media type of every submitted payload
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// A fully built POST request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRequest {
    /// Absolute URL of the registration endpoint
    pub endpoint: String,
    /// Header name/value pairs in the order they should be sent
    pub headers: Vec<(String, String)>,
    /// Serialized JSON body
    pub body: String,
}

impl OutboundRequest {
    /// Returns the first value of the named header (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Failures raised while delivering a request
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The connection could not be established
    #[error("Connection failed: {0}")]
    Connect(String),

    /// The request or response did not complete in time
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// The request could not be built (bad URL, invalid header value)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The response body could not be read
    #[error("Failed to read response body: {0}")]
    Body(String),

    /// Any other transport-level failure
    #[error("Transport failure: {0}")]
    Other(String),
}

/// Port trait for sending requests to the registration API
#[async_trait::async_trait]
pub trait IRegistrationTransport: Send + Sync {
    /// Sends the request and returns the status code and body verbatim
    ///
    /// A non-2xx status is a successful delivery, not an error.
    async fn send(&self, request: OutboundRequest) -> Result<SubmissionResponse, TransportError>;
}

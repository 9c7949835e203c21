//! docreg Client - Rate-limited document registration
//!
//! Provides an async client that submits documents to the registration API
//! while never admitting more than a fixed number of requests per recurring
//! time window.
//!
//! ## Modules
//!
//! - [`window`] - Shared admission counter reset on a fixed cadence
//! - [`submitter`] - The gated `submit` operation and its reset schedule
//! - [`transport`] - reqwest adapter for the transport port
//! - [`metrics`] - Prometheus metrics for admissions and submissions

pub mod metrics;
pub mod submitter;
pub mod transport;
pub mod window;

use docreg_core::ports::TransportError;
use thiserror::Error;

pub use submitter::{RateLimitedSubmitter, SubmitterBuilder};
pub use transport::ReqwestTransport;
pub use window::WindowCounter;

/// Errors returned by [`RateLimitedSubmitter::submit`]
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The document could not be serialized to JSON
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The request could not be delivered
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// The submitter shut down while the caller was waiting for admission
    #[error("Interrupted while waiting for admission")]
    InterruptedWait,

    /// The submitter was already shut down when the call was made
    #[error("Submitter has been shut down")]
    Closed,
}

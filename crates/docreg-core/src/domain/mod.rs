//! Domain types for document registration
//!
//! - The document payload sent to the registration API
//! - Quota configuration for the admission window
//! - Submission request/response values
//! - Domain-specific error types

pub mod document;
pub mod errors;
pub mod quota;
pub mod submission;

// Re-export commonly used types
pub use document::{Description, Document, Product};
pub use errors::DomainError;
pub use quota::{Quota, WindowUnit};
pub use submission::{SubmissionRequest, SubmissionResponse};

//! Domain error types

use thiserror::Error;

/// Errors that can occur when constructing domain values
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The quota window or admission limit is not usable
    #[error("Invalid quota: {0}")]
    InvalidQuota(String),
}

//! Reference data error types.

use thiserror::Error;

/// Errors from reference data and language configuration lookups.
#[derive(Debug, Clone, Error)]
pub enum ReferenceDataError {
    /// The backing service could not be reached or answered with a failure.
    #[error("Reference data unavailable: {0}")]
    Unavailable(String),

    /// The backing service answered with data that could not be read.
    #[error("Invalid reference data: {0}")]
    InvalidResponse(String),
}

impl ReferenceDataError {
    /// Create an unavailable error.
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Create an invalid response error.
    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }
}

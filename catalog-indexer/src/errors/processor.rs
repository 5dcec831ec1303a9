//! Error types for computed search field processors.

use catalog_indexer_repository::ReferenceDataError;
use thiserror::Error;

/// Errors a search field processor can return.
///
/// A processor error only drops the field the processor computes; the rest of
/// the document is still assembled.
#[derive(Error, Debug, Clone)]
pub enum ProcessorError {
    /// A reference data lookup the processor depends on failed.
    #[error("Reference data unavailable: {0}")]
    ReferenceDataUnavailable(#[from] ReferenceDataError),

    /// The resource data could not be interpreted by the processor.
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl ProcessorError {
    /// Create an invalid data error.
    pub fn invalid_data(msg: impl Into<String>) -> Self {
        Self::InvalidData(msg.into())
    }
}

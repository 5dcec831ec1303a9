//! Error types for loading and validating resource descriptions.

use thiserror::Error;

/// Errors raised while building the resource description registry.
///
/// These are startup failures: the indexer does not run with a schema it
/// cannot fully resolve.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// Resource description files could not be read.
    #[error("Failed to read resource descriptions: {0}")]
    Io(String),

    /// A resource description could not be parsed.
    #[error("Invalid resource description {origin}: {reason}")]
    Parse { origin: String, reason: String },

    /// Two descriptions were registered for the same resource type.
    #[error("Duplicate resource description: {0}")]
    Duplicate(String),

    /// A computed field names a processor that is not registered.
    #[error("Field {field} of resource {resource} references unknown processor {processor}")]
    UnknownProcessor {
        resource: String,
        field: String,
        processor: String,
    },
}

impl SchemaError {
    /// Create a parse error.
    pub fn parse(origin: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            origin: origin.into(),
            reason: reason.into(),
        }
    }
}

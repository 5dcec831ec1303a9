//! Error types for converting a resource event into a search document.

use thiserror::Error;

/// Errors that reject the conversion of one resource event.
///
/// None of these stop the pipeline: the event is logged and skipped while the
/// rest of its batch is converted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    /// No resource description is registered for the resource type.
    ///
    /// Retrying only makes sense after the registered descriptions change.
    #[error("Resource description not found: {0}")]
    SchemaNotFound(String),

    /// The event's resource state is not a key-value structure.
    #[error("Malformed payload for resource {id}: {reason}")]
    MalformedPayload { id: String, reason: String },

    /// The assembled document could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl ConversionError {
    /// Create a schema not found error.
    pub fn schema_not_found(resource_name: impl Into<String>) -> Self {
        Self::SchemaNotFound(resource_name.into())
    }

    /// Create a malformed payload error.
    pub fn malformed_payload(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedPayload {
            id: id.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for ConversionError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

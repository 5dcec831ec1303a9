//! Request and response types for collaborator operations.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::SearchIndexError;

/// Result of a batch operation for a single document.
///
/// Indicates whether writing one document succeeded and carries the error
/// details if it failed.
#[derive(Debug, Clone)]
pub struct BatchOperationResult {
    /// The document identifier.
    pub document_id: String,
    /// The index the document was addressed to.
    pub index: String,
    /// Whether the operation succeeded.
    pub success: bool,
    /// Error if the operation failed.
    pub error: Option<SearchIndexError>,
}

impl BatchOperationResult {
    /// A successful result.
    pub fn succeeded(document_id: impl Into<String>, index: impl Into<String>) -> Self {
        Self {
            document_id: document_id.into(),
            index: index.into(),
            success: true,
            error: None,
        }
    }

    /// A failed result.
    pub fn failed(
        document_id: impl Into<String>,
        index: impl Into<String>,
        error: SearchIndexError,
    ) -> Self {
        Self {
            document_id: document_id.into(),
            index: index.into(),
            success: false,
            error: Some(error),
        }
    }
}

/// Summary of a batch operation containing aggregate statistics and individual results.
///
/// Lets callers handle partial failures: a bulk request can succeed as a whole
/// while single documents in it are rejected.
#[derive(Debug, Clone)]
pub struct BatchOperationSummary {
    /// Total number of items in the batch.
    pub total: usize,
    /// Number of successful operations.
    pub succeeded: usize,
    /// Number of failed operations.
    pub failed: usize,
    /// Individual results for each item.
    pub results: Vec<BatchOperationResult>,
}

impl BatchOperationSummary {
    /// Build a summary from individual results.
    pub fn from_results(results: Vec<BatchOperationResult>) -> Self {
        let succeeded = results.iter().filter(|r| r.success).count();
        Self {
            total: results.len(),
            succeeded,
            failed: results.len() - succeeded,
            results,
        }
    }
}

/// Kind of reference data a lookup targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReferenceDataType {
    /// Call number types (classification schemes).
    CallNumberTypes,
    /// Identifier types (ISBN, ISSN, ...).
    IdentifierTypes,
}

impl fmt::Display for ReferenceDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CallNumberTypes => write!(f, "call-number-types"),
            Self::IdentifierTypes => write!(f, "identifier-types"),
        }
    }
}

/// One reference data record: an identifier plus filterable attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceRecord {
    pub id: String,
    #[serde(default)]
    pub attributes: HashMap<String, String>,
}

impl ReferenceRecord {
    /// Create a record with a single attribute.
    pub fn new(id: impl Into<String>, field: impl Into<String>, value: impl Into<String>) -> Self {
        let mut attributes = HashMap::new();
        attributes.insert(field.into(), value.into());
        Self {
            id: id.into(),
            attributes,
        }
    }

    /// Whether the record's `field` attribute is one of `values`.
    pub fn matches(&self, field: &str, values: &[String]) -> bool {
        self.attributes
            .get(field)
            .is_some_and(|value| values.iter().any(|v| v == value))
    }
}

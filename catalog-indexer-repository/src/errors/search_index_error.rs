//! Search index sink errors.
//!
//! Failures of a whole request are kept apart from failures of a single
//! document, which carry the index and id they were addressed to.

use catalog_indexer_shared::SearchDocumentBody;
use thiserror::Error;

/// Errors of the `SearchIndexProvider` sink.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SearchIndexError {
    /// The backend could not be reached or the client could not be built.
    #[error("Search index unreachable: {0}")]
    Unreachable(String),

    /// A bulk request failed as a whole, none of its documents is known to be written.
    #[error("Bulk request failed: {0}")]
    BulkRequestFailed(String),

    /// The backend answered with something other than the expected response.
    #[error("Unexpected search index response: {0}")]
    UnexpectedResponse(String),

    /// A document was refused before it was sent.
    #[error("Document {document_id} for {index} rejected: {reason}")]
    DocumentRejected {
        index: String,
        document_id: String,
        reason: String,
    },

    /// The payload of a document is not readable JSON.
    #[error("Document {document_id} for {index} has an unreadable payload: {reason}")]
    UnreadablePayload {
        index: String,
        document_id: String,
        reason: String,
    },

    /// The backend refused one document of a bulk request.
    #[error("Document {document_id} not indexed into {index}: {reason}")]
    DocumentNotIndexed {
        index: String,
        document_id: String,
        reason: String,
    },

    /// A delete request failed.
    #[error("Document {document_id} not deleted from {index}: {reason}")]
    DeleteFailed {
        index: String,
        document_id: String,
        reason: String,
    },
}

impl SearchIndexError {
    pub fn unreachable(msg: impl Into<String>) -> Self {
        Self::Unreachable(msg.into())
    }

    pub fn bulk_request_failed(msg: impl Into<String>) -> Self {
        Self::BulkRequestFailed(msg.into())
    }

    pub fn unexpected_response(msg: impl Into<String>) -> Self {
        Self::UnexpectedResponse(msg.into())
    }

    /// The document was refused before it was sent.
    pub fn rejected(document: &SearchDocumentBody, reason: impl Into<String>) -> Self {
        Self::DocumentRejected {
            index: document.index.clone(),
            document_id: document.id.clone(),
            reason: reason.into(),
        }
    }

    pub fn unreadable_payload(document: &SearchDocumentBody, reason: impl Into<String>) -> Self {
        Self::UnreadablePayload {
            index: document.index.clone(),
            document_id: document.id.clone(),
            reason: reason.into(),
        }
    }

    pub fn not_indexed(document: &SearchDocumentBody, reason: impl Into<String>) -> Self {
        Self::DocumentNotIndexed {
            index: document.index.clone(),
            document_id: document.id.clone(),
            reason: reason.into(),
        }
    }

    pub fn delete_failed(document: &SearchDocumentBody, reason: impl Into<String>) -> Self {
        Self::DeleteFailed {
            index: document.index.clone(),
            document_id: document.id.clone(),
            reason: reason.into(),
        }
    }

    /// Id of the document the error is about, if it concerns a single document.
    pub fn document_id(&self) -> Option<&str> {
        match self {
            Self::DocumentRejected { document_id, .. }
            | Self::UnreadablePayload { document_id, .. }
            | Self::DocumentNotIndexed { document_id, .. }
            | Self::DeleteFailed { document_id, .. } => Some(document_id),
            Self::Unreachable(_) | Self::BulkRequestFailed(_) | Self::UnexpectedResponse(_) => {
                None
            }
        }
    }
}

//! Search index provider trait definition.
//!
//! This module defines the abstract interface of the indexing sink, allowing
//! for different backend implementations (OpenSearch, Elasticsearch, etc.).

use async_trait::async_trait;
use catalog_indexer_shared::SearchDocumentBody;

use crate::errors::SearchIndexError;
use crate::types::BatchOperationSummary;

/// Abstracts the underlying search index implementation (OpenSearch, Elasticsearch, etc.).
///
/// Implementations are injected into the loader to enable dependency injection
/// and easy testing with mock implementations. Index and alias lifecycle is
/// managed outside this contract: every document body names its target index.
#[async_trait]
pub trait SearchIndexProvider: Send + Sync {
    /// Write multiple documents in bulk and return a summary of successful and failed operations.
    ///
    /// Every body must carry an index action and a payload; bodies that don't
    /// are reported as failed without reaching the backend.
    ///
    /// # Arguments
    ///
    /// * `documents` - Slice of document bodies to write
    ///
    /// # Returns
    ///
    /// * `Ok(BatchOperationSummary)` - Contains aggregate statistics and individual results
    /// * `Err(SearchIndexError)` - If the bulk operation fails entirely
    async fn bulk_index_documents(
        &self,
        documents: &[SearchDocumentBody],
    ) -> Result<BatchOperationSummary, SearchIndexError>;

    /// Delete a document from the search index.
    ///
    /// If the document doesn't exist, the operation is considered successful.
    ///
    /// # Arguments
    ///
    /// * `document` - The delete body naming the index and document id
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the document was deleted (or didn't exist)
    /// * `Err(SearchIndexError)` - If the deletion fails
    async fn delete_document(&self, document: &SearchDocumentBody) -> Result<(), SearchIndexError>;
}

//! Loader module for the catalog indexer ingest.
//!
//! Writes converted document bodies to the indexing sink.

use std::sync::Arc;
use tracing::{debug, error, instrument, warn};

use crate::errors::IngestError;
use crate::processor::ProcessedEvent;
use catalog_indexer_repository::SearchIndexProvider;
use catalog_indexer_shared::SearchDocumentBody;

/// Configuration for the search loader.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Number of documents to batch before flushing.
    pub batch_size: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self { batch_size: 100 }
    }
}

/// Loader that writes document bodies into the search engine.
///
/// Index bodies are buffered and written with bulk requests. A delete first
/// flushes the buffer so that it is never overtaken by an earlier upsert of
/// the same resource. Bodies of a failed bulk request stay buffered and are
/// written by the next flush.
pub struct SearchLoader {
    provider: Arc<dyn SearchIndexProvider>,
    config: LoaderConfig,
    pending_documents: Vec<SearchDocumentBody>,
    indexed_documents: u64,
}

impl SearchLoader {
    /// Create a new search loader with the given provider.
    pub fn new(provider: Arc<dyn SearchIndexProvider>) -> Self {
        Self::with_config(provider, LoaderConfig::default())
    }

    /// Create a new search loader with custom configuration.
    pub fn with_config(provider: Arc<dyn SearchIndexProvider>, config: LoaderConfig) -> Self {
        let batch_size = config.batch_size;
        Self {
            provider,
            config,
            pending_documents: Vec::with_capacity(batch_size),
            indexed_documents: 0,
        }
    }

    /// Number of buffered index bodies.
    pub fn pending(&self) -> usize {
        self.pending_documents.len()
    }

    /// Number of documents the search index accepted since startup.
    pub fn indexed_documents(&self) -> u64 {
        self.indexed_documents
    }

    /// Load a batch of processed events.
    ///
    /// Documents are batched and flushed when the batch size is reached.
    /// A failed flush does not stop the batch: the remaining events are still
    /// loaded and the first flush error is returned at the end.
    #[instrument(skip(self, events), fields(event_count = events.len()))]
    pub async fn load(&mut self, events: Vec<ProcessedEvent>) -> Result<(), IngestError> {
        let mut first_error: Option<IngestError> = None;

        for event in events {
            match event {
                ProcessedEvent::Index(document) => {
                    self.pending_documents.push(document);
                    let full = self.pending_documents.len() >= self.config.batch_size;
                    if full && first_error.is_none() {
                        if let Err(e) = self.flush().await {
                            first_error = Some(e);
                        }
                    }
                }
                ProcessedEvent::Delete(document) => {
                    if first_error.is_none() {
                        if let Err(e) = self.flush().await {
                            first_error = Some(e);
                        }
                    }
                    // Unwritten upserts of the deleted resource are superseded
                    self.discard_pending(&document);
                    self.delete(&document).await;
                }
            }
        }

        first_error.map_or(Ok(()), Err)
    }

    /// Flush all pending documents to the search index.
    ///
    /// The buffer is only cleared once the bulk request went through.
    #[instrument(skip(self))]
    pub async fn flush(&mut self) -> Result<(), IngestError> {
        if self.pending_documents.is_empty() {
            return Ok(());
        }

        let count = self.pending_documents.len();

        debug!(count = count, "Flushing documents to search index");

        match self
            .provider
            .bulk_index_documents(&self.pending_documents)
            .await
        {
            Ok(summary) => {
                self.pending_documents.clear();
                self.indexed_documents += summary.succeeded as u64;
                if summary.failed > 0 {
                    warn!(
                        succeeded = summary.succeeded,
                        failed = summary.failed,
                        "Bulk index completed with some failures"
                    );
                    for result in summary.results.iter().filter(|r| !r.success) {
                        if let Some(ref err) = result.error {
                            error!(
                                doc_id = %result.document_id,
                                index = %result.index,
                                error = %err,
                                "Failed to index document"
                            );
                        }
                    }
                } else {
                    debug!(count = summary.succeeded, "Successfully indexed all documents");
                }
                Ok(())
            }
            Err(e) => {
                error!(
                    error = %e,
                    count = count,
                    "Failed to bulk index documents, keeping them buffered"
                );
                Err(IngestError::loader(format!(
                    "Failed to bulk index {} documents: {}",
                    count, e
                )))
            }
        }
    }

    fn discard_pending(&mut self, deleted: &SearchDocumentBody) {
        let before = self.pending_documents.len();
        self.pending_documents
            .retain(|pending| pending.id != deleted.id || pending.index != deleted.index);
        let discarded = before - self.pending_documents.len();
        if discarded > 0 {
            debug!(
                doc_id = %deleted.id,
                discarded = discarded,
                "Dropped buffered upserts of deleted document"
            );
        }
    }

    async fn delete(&self, document: &SearchDocumentBody) {
        if let Err(e) = self.provider.delete_document(document).await {
            // Logged only, the document may never have been indexed
            warn!(
                doc_id = %document.id,
                index = %document.index,
                error = %e,
                "Failed to delete document"
            );
        }
    }
}

//! Resource event processor.

use catalog_indexer_shared::{ResourceEvent, SearchDocumentBody};
use futures::future::join_all;
use tracing::{debug, error, instrument, warn};

use crate::converter::SearchDocumentConverter;
use crate::errors::ConversionError;

/// Result of processing one resource event.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessedEvent {
    /// Document to write into the index.
    Index(SearchDocumentBody),
    /// Document to remove from the index.
    Delete(SearchDocumentBody),
}

impl ProcessedEvent {
    /// The document body, whichever the operation.
    pub fn document(&self) -> &SearchDocumentBody {
        match self {
            Self::Index(document) | Self::Delete(document) => document,
        }
    }
}

/// Processor that turns resource events into document bodies.
pub struct ResourceEventProcessor {
    converter: SearchDocumentConverter,
}

impl ResourceEventProcessor {
    /// Create a new processor using `converter` for upsert events.
    pub fn new(converter: SearchDocumentConverter) -> Self {
        Self { converter }
    }

    /// Process a batch of events.
    ///
    /// The events of a batch are converted concurrently. Events that cannot
    /// be converted are logged and left out; they never fail the batch.
    /// Results keep the order of the events.
    #[instrument(skip(self, events), fields(event_count = events.len()))]
    pub async fn process_batch(&self, events: &[ResourceEvent]) -> Vec<ProcessedEvent> {
        let results = join_all(events.iter().map(|event| self.process(event))).await;

        let processed: Vec<ProcessedEvent> = results.into_iter().flatten().collect();
        debug!(
            event_count = events.len(),
            processed_count = processed.len(),
            "Processed batch"
        );
        processed
    }

    /// Process a single event.
    pub async fn process(&self, event: &ResourceEvent) -> Option<ProcessedEvent> {
        match self.converter.convert(event).await {
            Ok(Some(document)) => Some(ProcessedEvent::Index(document)),
            Ok(None) => {
                let index = self
                    .converter
                    .index_name(&event.resource_name, &event.tenant);
                Some(ProcessedEvent::Delete(SearchDocumentBody::for_delete(
                    event, index,
                )))
            }
            Err(e @ ConversionError::SchemaNotFound(_)) => {
                error!(
                    id = %event.id,
                    tenant = %event.tenant,
                    resource = %event.resource_name,
                    error = %e,
                    "No resource description for event"
                );
                None
            }
            Err(e) => {
                warn!(
                    id = %event.id,
                    tenant = %event.tenant,
                    resource = %event.resource_name,
                    error = %e,
                    "Skipping event that could not be converted"
                );
                None
            }
        }
    }
}

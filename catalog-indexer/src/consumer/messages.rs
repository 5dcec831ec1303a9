//! Message types for the consumer.
//!
//! Defines the messages that flow between the consumer and the orchestrator.

use catalog_indexer_shared::ResourceEvent;

/// Messages that flow through the ingest.
#[derive(Debug)]
pub enum StreamMessage {
    /// A batch of resource events with the source offsets they were read at.
    Events {
        events: Vec<ResourceEvent>,
        offsets: Vec<u64>,
    },
    /// Acknowledgment that events were processed (or failed to be).
    Acknowledgment {
        offsets: Vec<u64>,
        success: bool,
        error: Option<String>,
    },
    /// Stream has ended.
    End,
    /// An error occurred.
    Error(String),
}

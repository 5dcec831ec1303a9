//! Processor module for the catalog indexer ingest.
//!
//! Transforms resource events into search document bodies.

mod event_processor;

pub use event_processor::{ProcessedEvent, ResourceEventProcessor};

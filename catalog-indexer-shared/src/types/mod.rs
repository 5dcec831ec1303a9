//! This module defines the core data structures shared by the catalog indexer.
//! It re-exports `ResourceEvent` and `SearchDocumentBody`.

pub mod resource_event;
pub mod search_document;

pub use resource_event::{ResourceEvent, ResourceEventType};
pub use search_document::{IndexActionType, SearchDocumentBody};

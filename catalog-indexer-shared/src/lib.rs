//! # Catalog Indexer Shared
//!
//! This crate defines shared data structures used across the catalog indexer crates.
//! It includes the inbound resource event and the outbound search document body.

pub mod types;

pub use types::resource_event::{ResourceEvent, ResourceEventType};
pub use types::search_document::{IndexActionType, SearchDocumentBody};

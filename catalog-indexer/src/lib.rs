//! # Catalog Indexer
//!
//! Search indexer for library catalog resources - converts resource change
//! events (instances, holdings, items) into search documents and indexes them
//! into OpenSearch.
//!
//! ## Architecture
//!
//! The indexer follows the Consumer-Processor-Loader pattern:
//!
//! 1. **Consumer**: Reads resource events
//! 2. **Processor**: Converts events into search document bodies
//! 3. **Loader**: Writes document bodies into OpenSearch
//! 4. **Orchestrator**: Coordinates the ingest flow
//!
//! A conversion resolves the resource description of the event, the
//! languages of the resource, converts the described fields recursively,
//! computes the search fields and assembles the document.
//!
//! ## Modules
//!
//! - [`schema`]: Resource descriptions and the configuration snapshot
//! - [`converter`]: Recursive conversion and document assembly
//! - [`search_fields`]: Computed search field processors
//! - [`config`]: Configuration and dependency initialization
//! - [`consumer`]: Resource event sources
//! - [`processor`]: Converts event batches into documents
//! - [`loader`]: Writes documents into OpenSearch
//! - [`orchestrator`]: Coordinates the ingest flow
//! - [`errors`]: Error types for the indexer

pub mod config;
pub mod consumer;
pub mod converter;
pub mod errors;
pub mod loader;
pub mod orchestrator;
pub mod processor;
pub mod schema;
pub mod search_fields;

pub use config::Dependencies;
pub use errors::{ConversionError, IngestError};

use thiserror::Error;

/// Errors that can occur during indexer initialization or execution.
#[derive(Error, Debug)]
pub enum IndexingError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Ingest error.
    #[error("Ingest error: {0}")]
    IngestError(#[from] IngestError),
}

impl IndexingError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}

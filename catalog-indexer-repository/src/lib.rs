//! # Catalog Indexer Repository
//!
//! This crate provides the contracts of the collaborators the catalog indexer
//! talks to: the search index sink, the reference data service and the
//! language configuration. It includes an OpenSearch implementation of the
//! sink and static in-memory implementations of the read-only collaborators.

pub mod errors;
pub mod in_memory;
pub mod interfaces;
pub mod opensearch;
pub mod types;

pub use errors::{ReferenceDataError, SearchIndexError};
pub use in_memory::{StaticLanguageConfig, StaticReferenceData};
pub use interfaces::{LanguageConfigProvider, ReferenceDataProvider, SearchIndexProvider};
pub use opensearch::OpenSearchProvider;
pub use types::{BatchOperationResult, BatchOperationSummary, ReferenceDataType, ReferenceRecord};

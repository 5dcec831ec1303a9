//! Error types for the catalog indexer repository.
//!
//! One error type for the search index sink and one for the read-only
//! reference collaborators.

mod reference_data_error;
mod search_index_error;

pub use reference_data_error::ReferenceDataError;
pub use search_index_error::SearchIndexError;

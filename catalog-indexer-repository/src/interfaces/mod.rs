//! Interface definitions for the indexer's collaborators.
//!
//! The traits here allow for dependency injection and swappable backends:
//! the search index sink, the reference data service and the language
//! configuration store.

mod language_config_provider;
mod reference_data_provider;
mod search_index_provider;

pub use language_config_provider::LanguageConfigProvider;
pub use reference_data_provider::ReferenceDataProvider;
pub use search_index_provider::SearchIndexProvider;

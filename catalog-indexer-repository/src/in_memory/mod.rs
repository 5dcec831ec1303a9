//! Static in-memory implementations of the read-only collaborators.
//!
//! Used when reference data and language configuration are supplied through
//! process configuration instead of a remote service, and in tests.

mod language_config;
mod reference_data;

pub use language_config::StaticLanguageConfig;
pub use reference_data::StaticReferenceData;

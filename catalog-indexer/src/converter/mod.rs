//! Conversion of resource events into search documents.
//!
//! The flow for one event: resolve the resource description, resolve the
//! resource languages, convert the described fields recursively, compute the
//! search fields, merge both and assemble the document body.

mod assembler;
mod context;
mod document_converter;
mod fields;
mod languages;
mod merge;
mod paths;
mod plain_values;

pub use assembler::{assemble, index_name, DEFAULT_INDEX_ENV};
pub use context::ConversionContext;
pub use document_converter::SearchDocumentConverter;
pub use fields::convert_fields;
pub use languages::resolve_languages;
pub use merge::merge_safely;
pub use paths::{string_values, values_at_path};
pub use plain_values::{plain_field_entries, PLAIN_FIELD_PREFIX, SOURCE_LANGUAGE_KEY};

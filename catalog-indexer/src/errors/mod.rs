//! Error types for the catalog indexer.
//!
//! Conversion errors reject a single event, processor errors degrade a single
//! computed field, schema errors stop startup, and ingest errors concern the
//! pipeline around them.

mod conversion;
mod ingest;
mod processor;
mod schema;

pub use conversion::ConversionError;
pub use ingest::IngestError;
pub use processor::ProcessorError;
pub use schema::SchemaError;

//! Schema model of the resources the indexer converts.
//!
//! Resource descriptions are declarative: each one maps the fields of a
//! resource type onto document fields. They are loaded once and published
//! through an immutable snapshot.

mod field_description;
mod registry;
mod resource_description;
mod snapshot;

pub use field_description::{
    FieldDescription, FieldMap, ObjectFieldDescription, PlainFieldDescription,
    SearchFieldDescriptor, MULTILANG_INDEX, STANDARD_INDEX,
};
pub use registry::ResourceDescriptionRegistry;
pub use resource_description::ResourceDescription;
pub use snapshot::{ConversionSnapshot, SnapshotStore};

//! Assembly of the search document body.

use catalog_indexer_shared::SearchDocumentBody;
use serde_json::{Map, Value};

use crate::converter::context::ConversionContext;
use crate::converter::merge::merge_safely;
use crate::errors::ConversionError;

/// Index environment prefix used when none is configured.
pub const DEFAULT_INDEX_ENV: &str = "catalog";

/// Name of the index holding `resource_name` documents of `tenant`.
///
/// # Example
///
/// ```
/// use catalog_indexer::converter::index_name;
///
/// assert_eq!(index_name("catalog", "Instance", "DIKU"), "catalog_instance_diku");
/// ```
pub fn index_name(env: &str, resource_name: &str, tenant: &str) -> String {
    format!("{}_{}_{}", env, resource_name, tenant).to_lowercase()
}

/// Merge base and computed fields and build the document body for `context`.
///
/// An empty merge result is a valid document and serializes to `{}`.
///
/// # Arguments
///
/// * `base_fields` - Fields produced by the recursive conversion
/// * `computed_fields` - Fields produced by the search field processors
/// * `context` - Conversion context of the event
/// * `index` - Target index name
///
/// # Returns
///
/// * `Ok(SearchDocumentBody)` - The document body to index
/// * `Err(ConversionError)` - If the document cannot be serialized
pub fn assemble(
    base_fields: Map<String, Value>,
    computed_fields: Map<String, Value>,
    context: &ConversionContext,
    index: impl Into<String>,
) -> Result<SearchDocumentBody, ConversionError> {
    let document = merge_safely(base_fields, computed_fields);
    let payload = serde_json::to_string(&Value::Object(document))?;

    Ok(SearchDocumentBody::for_upsert(
        context.id.clone(),
        context.tenant.clone(),
        index,
        context.event_type,
        payload,
    ))
}

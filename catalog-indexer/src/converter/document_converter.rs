//! Conversion of one resource event into a search document body.

use std::sync::Arc;

use catalog_indexer_shared::{ResourceEvent, SearchDocumentBody};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::converter::assembler::{assemble, index_name};
use crate::converter::context::ConversionContext;
use crate::converter::fields::convert_fields;
use crate::converter::languages::resolve_languages;
use crate::errors::ConversionError;
use crate::schema::SnapshotStore;
use crate::search_fields::SearchFieldsProcessor;

/// Converts resource events into search document bodies.
///
/// Conversions share nothing but the snapshot store and the processor
/// registry, so any number of them can run concurrently.
#[derive(Clone)]
pub struct SearchDocumentConverter {
    snapshots: Arc<SnapshotStore>,
    search_fields: SearchFieldsProcessor,
    index_env: String,
}

impl SearchDocumentConverter {
    /// Create a new converter.
    ///
    /// # Arguments
    ///
    /// * `snapshots` - Source of the schema and language configuration
    /// * `search_fields` - Resolver of computed fields
    /// * `index_env` - Prefix of the target index names
    pub fn new(
        snapshots: Arc<SnapshotStore>,
        search_fields: SearchFieldsProcessor,
        index_env: impl Into<String>,
    ) -> Self {
        Self {
            snapshots,
            search_fields,
            index_env: index_env.into(),
        }
    }

    /// Name of the index holding `resource_name` documents of `tenant`.
    pub fn index_name(&self, resource_name: &str, tenant: &str) -> String {
        index_name(&self.index_env, resource_name, tenant)
    }

    /// Convert an upsert event into the document body to index.
    ///
    /// The schema and language snapshot is taken once, when the conversion
    /// starts. Delete events carry no state and produce no document.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(SearchDocumentBody))` - The document of an upsert event
    /// * `Ok(None)` - For delete events of a registered resource type
    /// * `Err(ConversionError)` - If the resource type is unknown or the state malformed
    #[instrument(
        skip(self, event),
        fields(id = %event.id, resource = %event.resource_name, tenant = %event.tenant)
    )]
    pub async fn convert(
        &self,
        event: &ResourceEvent,
    ) -> Result<Option<SearchDocumentBody>, ConversionError> {
        let snapshot = self.snapshots.current();
        // Deletes of unregistered resource types are rejected like upserts
        let description = snapshot.descriptions.get(&event.resource_name)?;

        if !event.event_type.is_upsert() {
            return Ok(None);
        }

        let state = match &event.new {
            Some(state @ Value::Object(_)) => state,
            Some(_) => {
                return Err(ConversionError::malformed_payload(
                    &event.id,
                    "resource state is not an object",
                ))
            }
            None => {
                return Err(ConversionError::malformed_payload(
                    &event.id,
                    "resource state is missing",
                ))
            }
        };

        let languages = resolve_languages(
            &description.language_source_paths,
            state,
            &snapshot.supported_languages,
        );

        let context = ConversionContext {
            id: event.id.clone(),
            tenant: event.tenant.clone(),
            event_type: event.event_type,
            resource_data: state.as_object().cloned().unwrap_or_default(),
            resource_description: description,
            languages,
        };

        let base_fields = convert_fields(
            &context.resource_data,
            &context.resource_description.fields,
            &context,
        );
        let computed_fields = self.search_fields.get_search_fields(&context).await;
        debug!(
            base_fields = base_fields.len(),
            computed_fields = computed_fields.len(),
            languages = ?context.languages,
            "Converted resource"
        );

        let index = self.index_name(context.resource_name(), &context.tenant);
        assemble(base_fields, computed_fields, &context, index).map(Some)
    }
}

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use catalog_indexer_repository::ReferenceDataProvider;
use serde_json::Value;

use crate::converter::ConversionContext;
use crate::errors::ProcessorError;
use crate::search_fields::effective_call_number::{
    ItemEffectiveCallNumberProcessor, ITEM_EFFECTIVE_CALL_NUMBER_PROCESSOR,
};
use crate::search_fields::typed_call_number::{
    ItemTypedCallNumberProcessor, ITEM_TYPED_CALL_NUMBER_PROCESSOR,
};

/// A processor computing the values of one computed search field.
#[async_trait]
pub trait SearchFieldProcessor: Send + Sync {
    /// Compute the field values from the full resource data.
    ///
    /// Missing or unusable input yields an empty sequence. Errors are kept for
    /// failures of the processor itself, such as an unavailable lookup.
    ///
    /// # Arguments
    ///
    /// * `context` - The conversion context of the event
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<Value>)` - The values in the order they should be indexed
    /// * `Err(ProcessorError)` - If the values could not be computed
    async fn compute_values(&self, context: &ConversionContext)
        -> Result<Vec<Value>, ProcessorError>;
}

/// `SearchFieldProcessorRegistry` maps processor names used by resource
/// descriptions to processor instances.
#[derive(Default, Clone)]
pub struct SearchFieldProcessorRegistry {
    processors: HashMap<String, Arc<dyn SearchFieldProcessor>>,
}

impl SearchFieldProcessorRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding every processor shipped with the indexer.
    ///
    /// # Arguments
    ///
    /// * `reference_data` - Reference data lookups for processors that need them
    pub fn with_defaults(reference_data: Arc<dyn ReferenceDataProvider>) -> Self {
        let mut registry = Self::new();
        registry.register(
            ITEM_TYPED_CALL_NUMBER_PROCESSOR,
            Arc::new(ItemTypedCallNumberProcessor::new(reference_data)),
        );
        registry.register(
            ITEM_EFFECTIVE_CALL_NUMBER_PROCESSOR,
            Arc::new(ItemEffectiveCallNumberProcessor),
        );
        registry
    }

    /// Registers a processor under `name`, replacing any previous one.
    pub fn register(&mut self, name: impl Into<String>, processor: Arc<dyn SearchFieldProcessor>) {
        self.processors.insert(name.into(), processor);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn SearchFieldProcessor>> {
        self.processors.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.processors.contains_key(name)
    }

    /// Registered processor names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.processors.keys().map(String::as_str)
    }
}

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::warn;

use crate::converter::ConversionContext;
use crate::search_fields::processor::SearchFieldProcessorRegistry;

/// Resolves the computed fields of a resource.
#[derive(Clone)]
pub struct SearchFieldsProcessor {
    registry: Arc<SearchFieldProcessorRegistry>,
}

impl SearchFieldsProcessor {
    pub fn new(registry: Arc<SearchFieldProcessorRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &SearchFieldProcessorRegistry {
        &self.registry
    }

    /// Compute every computed field declared by the resource description.
    ///
    /// Fields without values are left out. A failing processor only loses its
    /// own field: the failure is logged and the other fields are still
    /// computed.
    pub async fn get_search_fields(&self, context: &ConversionContext) -> Map<String, Value> {
        let mut fields = Map::new();

        for (field, desc) in context.resource_description.computed_fields() {
            let Some(processor) = self.registry.get(&desc.processor) else {
                warn!(
                    resource = %context.resource_name(),
                    field = %field,
                    processor = %desc.processor,
                    "Search field processor is not registered"
                );
                continue;
            };

            match processor.compute_values(context).await {
                Ok(values) if values.is_empty() => {}
                Ok(values) => {
                    fields.insert(field.to_string(), Value::Array(values));
                }
                Err(e) => {
                    warn!(
                        resource = %context.resource_name(),
                        id = %context.id,
                        tenant = %context.tenant,
                        field = %field,
                        processor = %desc.processor,
                        error = %e,
                        "Failed to compute search field"
                    );
                }
            }
        }

        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ProcessorError;
    use crate::schema::{ResourceDescription, SearchFieldDescriptor};
    use crate::search_fields::SearchFieldProcessor;
    use async_trait::async_trait;
    use catalog_indexer_repository::ReferenceDataError;
    use catalog_indexer_shared::ResourceEventType;
    use serde_json::json;

    struct FixedProcessor(Vec<Value>);

    #[async_trait]
    impl SearchFieldProcessor for FixedProcessor {
        async fn compute_values(
            &self,
            _context: &ConversionContext,
        ) -> Result<Vec<Value>, ProcessorError> {
            Ok(self.0.clone())
        }
    }

    struct FailingProcessor;

    #[async_trait]
    impl SearchFieldProcessor for FailingProcessor {
        async fn compute_values(
            &self,
            _context: &ConversionContext,
        ) -> Result<Vec<Value>, ProcessorError> {
            Err(ReferenceDataError::unavailable("timeout").into())
        }
    }

    fn processor() -> SearchFieldsProcessor {
        let mut registry = SearchFieldProcessorRegistry::new();
        registry.register("fixed", Arc::new(FixedProcessor(vec![json!(1), json!(2)])));
        registry.register("empty", Arc::new(FixedProcessor(Vec::new())));
        registry.register("failing", Arc::new(FailingProcessor));
        SearchFieldsProcessor::new(Arc::new(registry))
    }

    fn context(search_fields: &[(&str, &str)]) -> ConversionContext {
        let mut description = ResourceDescription::new("instance");
        for (field, processor) in search_fields {
            description
                .search_fields
                .insert(field.to_string(), SearchFieldDescriptor::new(*processor));
        }
        ConversionContext {
            id: "instance-1".to_string(),
            tenant: "diku".to_string(),
            event_type: ResourceEventType::Create,
            resource_data: Map::new(),
            resource_description: Arc::new(description),
            languages: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_computed_values() {
        let fields = processor()
            .get_search_fields(&context(&[("keys", "fixed")]))
            .await;

        assert_eq!(Value::Object(fields), json!({ "keys": [1, 2] }));
    }

    #[tokio::test]
    async fn test_failing_processor_only_loses_its_field() {
        let fields = processor()
            .get_search_fields(&context(&[
                ("broken", "failing"),
                ("keys", "fixed"),
                ("nothing", "empty"),
                ("unknown", "missing"),
            ]))
            .await;

        assert_eq!(Value::Object(fields), json!({ "keys": [1, 2] }));
    }

    #[tokio::test]
    async fn test_no_computed_fields() {
        let fields = processor().get_search_fields(&context(&[])).await;

        assert!(fields.is_empty());
    }
}

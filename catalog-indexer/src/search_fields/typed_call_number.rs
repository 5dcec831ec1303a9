//! Typed call number keys of an instance's items.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use catalog_indexer_repository::{ReferenceDataProvider, ReferenceDataType};
use serde_json::{Map, Value};
use tracing::debug;

use crate::converter::ConversionContext;
use crate::errors::ProcessorError;
use crate::search_fields::call_number::{CallNumberScheme, COMPONENTS_FIELD, ITEMS_FIELD};
use crate::search_fields::processor::SearchFieldProcessor;

pub const ITEM_TYPED_CALL_NUMBER_PROCESSOR: &str = "itemTypedCallNumberProcessor";

const SHELVING_ORDER_FIELD: &str = "effectiveShelvingOrder";
const ITEM_LEVEL_TYPE_FIELD: &str = "itemLevelCallNumberTypeId";
const COMPONENTS_TYPE_FIELD: &str = "typeId";

/// Computes one sortable call number key per item.
///
/// Items are skipped when their shelving order or call number type is
/// missing, when the shelving order normalizes to nothing, or when the type
/// is neither a system scheme nor a local type of the tenant. Keys keep the
/// order of the items.
pub struct ItemTypedCallNumberProcessor {
    reference_data: Arc<dyn ReferenceDataProvider>,
}

impl ItemTypedCallNumberProcessor {
    pub fn new(reference_data: Arc<dyn ReferenceDataProvider>) -> Self {
        Self { reference_data }
    }

    async fn fetch_local_types(&self, tenant: &str) -> Result<HashSet<String>, ProcessorError> {
        let local_types = self
            .reference_data
            .fetch(
                tenant,
                ReferenceDataType::CallNumberTypes,
                "source",
                &["local".to_string()],
            )
            .await?;
        debug!(tenant = %tenant, count = local_types.len(), "Fetched local call number types");
        Ok(local_types)
    }
}

#[async_trait]
impl SearchFieldProcessor for ItemTypedCallNumberProcessor {
    async fn compute_values(
        &self,
        context: &ConversionContext,
    ) -> Result<Vec<Value>, ProcessorError> {
        let Some(items) = context.resource_data.get(ITEMS_FIELD).and_then(Value::as_array) else {
            return Ok(Vec::new());
        };

        // Fetched on the first item with a non-system type, then reused
        let mut local_types: Option<HashSet<String>> = None;
        let mut keys = Vec::new();

        for item in items.iter().filter_map(Value::as_object) {
            let (Some(shelving_order), Some(type_id)) =
                (non_blank(item, SHELVING_ORDER_FIELD), call_number_type_id(item))
            else {
                continue;
            };

            let scheme = match CallNumberScheme::from_system_type_id(type_id) {
                Some(scheme) => scheme,
                None => {
                    if local_types.is_none() {
                        local_types = Some(self.fetch_local_types(&context.tenant).await?);
                    }
                    if !local_types.as_ref().is_some_and(|types| types.contains(type_id)) {
                        continue;
                    }
                    CallNumberScheme::Local
                }
            };

            if let Some(key) = scheme.shelving_order_key(shelving_order) {
                keys.push(Value::from(key));
            }
        }

        Ok(keys)
    }
}

fn non_blank<'a>(object: &'a Map<String, Value>, field: &str) -> Option<&'a str> {
    object
        .get(field)
        .and_then(Value::as_str)
        .filter(|value| !value.trim().is_empty())
}

fn call_number_type_id(item: &Map<String, Value>) -> Option<&str> {
    non_blank(item, ITEM_LEVEL_TYPE_FIELD).or_else(|| {
        item.get(COMPONENTS_FIELD)
            .and_then(Value::as_object)
            .and_then(|components| non_blank(components, COMPONENTS_TYPE_FIELD))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ResourceDescription;
    use catalog_indexer_repository::{ReferenceDataError, StaticReferenceData};
    use catalog_indexer_shared::ResourceEventType;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const LC: &str = "95467209-6d7b-468b-94df-0f5d7ad2747d";
    const DEWEY: &str = "03dd64d0-5626-4ecd-8ece-4531e0069f35";
    const NLM: &str = "054d460d-d6b9-4469-9e37-7a78a2266655";
    const SUDOC: &str = "fc388041-6cd0-4806-8a74-ebe3b9ab4c6e";
    const OTHER: &str = "6caca63e-5651-4db6-9247-3205156e9699";
    const LOCAL: &str = "d644be8f-deb5-4c4d-8c9e-2291b7c0f46f";

    /// Reference data counting its lookups.
    struct CountingReferenceData {
        inner: StaticReferenceData,
        calls: AtomicUsize,
    }

    impl CountingReferenceData {
        fn new(local_types: &[&str]) -> Self {
            Self {
                inner: StaticReferenceData::new()
                    .with_local_call_number_types(local_types.iter().copied()),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ReferenceDataProvider for CountingReferenceData {
        async fn fetch(
            &self,
            tenant: &str,
            data_type: ReferenceDataType,
            filter_field: &str,
            filter_values: &[String],
        ) -> Result<HashSet<String>, ReferenceDataError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner
                .fetch(tenant, data_type, filter_field, filter_values)
                .await
        }
    }

    struct UnavailableReferenceData;

    #[async_trait]
    impl ReferenceDataProvider for UnavailableReferenceData {
        async fn fetch(
            &self,
            _tenant: &str,
            _data_type: ReferenceDataType,
            _filter_field: &str,
            _filter_values: &[String],
        ) -> Result<HashSet<String>, ReferenceDataError> {
            Err(ReferenceDataError::unavailable("connection refused"))
        }
    }

    fn context(items: Value) -> ConversionContext {
        let data = json!({ "id": "instance-1", "items": items });
        ConversionContext {
            id: "instance-1".to_string(),
            tenant: "diku".to_string(),
            event_type: ResourceEventType::Create,
            resource_data: data.as_object().cloned().unwrap(),
            resource_description: Arc::new(ResourceDescription::new("instance")),
            languages: Vec::new(),
        }
    }

    fn item(shelving_order: &str, type_id: &str) -> Value {
        json!({ "effectiveShelvingOrder": shelving_order, "itemLevelCallNumberTypeId": type_id })
    }

    fn keys(values: Vec<Value>) -> Vec<i64> {
        values.iter().map(|v| v.as_i64().unwrap()).collect()
    }

    #[tokio::test]
    async fn test_same_shelving_order_in_every_scheme() {
        let reference_data = Arc::new(CountingReferenceData::new(&[LOCAL]));
        let processor = ItemTypedCallNumberProcessor::new(reference_data.clone());
        let ctx = context(json!([
            item("HD 11", LOCAL),
            item("HD 11", LC),
            item("HD 11", DEWEY),
            item("HD 11", NLM),
            item("HD 11", SUDOC),
            item("HD 11", OTHER),
        ]));

        let keys = keys(processor.compute_values(&ctx).await.unwrap());

        assert_eq!(keys.len(), 6);
        for pair in keys.windows(2) {
            assert_eq!(pair[1] - pair[0], 1 << 60);
        }
        assert_eq!(reference_data.calls(), 1);
    }

    #[tokio::test]
    async fn test_keys_keep_item_order() {
        let processor =
            ItemTypedCallNumberProcessor::new(Arc::new(StaticReferenceData::new()));
        let ctx = context(json!([
            item("QA 76.73", LC),
            item("HD 11", DEWEY),
            item("HD 11", LC),
        ]));

        let keys = keys(processor.compute_values(&ctx).await.unwrap());

        assert_eq!(keys.len(), 3);
        assert!(keys[2] < keys[0]);
        assert!(keys[0] < keys[1]);
    }

    #[tokio::test]
    async fn test_type_from_effective_components() {
        let processor =
            ItemTypedCallNumberProcessor::new(Arc::new(StaticReferenceData::new()));
        let ctx = context(json!([
            {
                "effectiveShelvingOrder": "HD 11",
                "effectiveCallNumberComponents": { "callNumber": "HD11", "typeId": LC }
            },
            {
                "effectiveShelvingOrder": "HD 11",
                "itemLevelCallNumberTypeId": DEWEY,
                "effectiveCallNumberComponents": { "typeId": LC }
            }
        ]));

        let keys = keys(processor.compute_values(&ctx).await.unwrap());

        assert_eq!(keys.len(), 2);
        assert_eq!(keys[1] - keys[0], 1 << 60);
    }

    #[tokio::test]
    async fn test_unusable_items_are_skipped() {
        let reference_data = Arc::new(CountingReferenceData::new(&[]));
        let processor = ItemTypedCallNumberProcessor::new(reference_data.clone());
        let ctx = context(json!([
            { "effectiveShelvingOrder": "HD 11" },
            { "itemLevelCallNumberTypeId": LC },
            item("()[]", LC),
            item("   ", LC),
            item("AAA", ""),
            item("HD 11", "unknown-type"),
            "not an item",
            item("HD 11", LC),
        ]));

        let keys = keys(processor.compute_values(&ctx).await.unwrap());

        assert_eq!(keys.len(), 1);
        assert_eq!(reference_data.calls(), 1);
    }

    #[tokio::test]
    async fn test_empty_type_id_needs_no_lookup() {
        let reference_data = Arc::new(CountingReferenceData::new(&[LOCAL]));
        let processor = ItemTypedCallNumberProcessor::new(reference_data.clone());
        let ctx = context(json!([item("AAA", ""), item("BBB", "  ")]));

        let keys = processor.compute_values(&ctx).await.unwrap();

        assert!(keys.is_empty());
        assert_eq!(reference_data.calls(), 0);
    }

    #[tokio::test]
    async fn test_system_types_need_no_lookup() {
        let reference_data = Arc::new(CountingReferenceData::new(&[LOCAL]));
        let processor = ItemTypedCallNumberProcessor::new(reference_data.clone());
        let ctx = context(json!([item("HD 11", LC), item("QA 1", NLM)]));

        let keys = processor.compute_values(&ctx).await.unwrap();

        assert_eq!(keys.len(), 2);
        assert_eq!(reference_data.calls(), 0);
    }

    #[tokio::test]
    async fn test_without_items() {
        let processor =
            ItemTypedCallNumberProcessor::new(Arc::new(StaticReferenceData::new()));

        assert!(processor.compute_values(&context(json!([]))).await.unwrap().is_empty());
        assert!(processor
            .compute_values(&context(json!("not a list")))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_failing_lookup() {
        let processor = ItemTypedCallNumberProcessor::new(Arc::new(UnavailableReferenceData));
        let ctx = context(json!([item("HD 11", LC), item("HD 11", LOCAL)]));

        let result = processor.compute_values(&ctx).await;

        assert!(matches!(
            result,
            Err(ProcessorError::ReferenceDataUnavailable(_))
        ));
    }
}

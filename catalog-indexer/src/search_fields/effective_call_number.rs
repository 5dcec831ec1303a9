//! Full effective call numbers of an instance's items.

use async_trait::async_trait;
use serde_json::Value;

use crate::converter::ConversionContext;
use crate::errors::ProcessorError;
use crate::search_fields::call_number::{COMPONENTS_FIELD, ITEMS_FIELD};
use crate::search_fields::processor::SearchFieldProcessor;

pub const ITEM_EFFECTIVE_CALL_NUMBER_PROCESSOR: &str = "itemEffectiveCallNumberProcessor";

const COMPONENT_FIELDS: [&str; 3] = ["prefix", "callNumber", "suffix"];

/// Joins prefix, call number and suffix of every item's effective call number.
///
/// Blank components are left out; duplicates are reported once, in the order
/// the items list them.
pub struct ItemEffectiveCallNumberProcessor;

#[async_trait]
impl SearchFieldProcessor for ItemEffectiveCallNumberProcessor {
    async fn compute_values(
        &self,
        context: &ConversionContext,
    ) -> Result<Vec<Value>, ProcessorError> {
        let Some(items) = context.resource_data.get(ITEMS_FIELD).and_then(Value::as_array) else {
            return Ok(Vec::new());
        };

        let mut call_numbers: Vec<String> = Vec::new();
        for components in items
            .iter()
            .filter_map(|item| item.get(COMPONENTS_FIELD))
        {
            let full_call_number = COMPONENT_FIELDS
                .iter()
                .filter_map(|field| components.get(*field).and_then(Value::as_str))
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
                .join(" ");

            if !full_call_number.is_empty() && !call_numbers.contains(&full_call_number) {
                call_numbers.push(full_call_number);
            }
        }

        Ok(call_numbers.into_iter().map(Value::String).collect())
    }
}

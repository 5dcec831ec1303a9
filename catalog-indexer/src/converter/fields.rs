//! Recursive conversion of resource data against field descriptions.

use serde_json::{Map, Value};

use crate::converter::context::ConversionContext;
use crate::converter::plain_values::plain_field_entries;
use crate::schema::{FieldDescription, FieldMap, PlainFieldDescription};

/// Convert `data` using `fields`, producing the document fields they describe.
///
/// Applied to the whole resource first and then recursively to nested
/// objects. Computed fields are skipped here; the search field processors
/// resolve them. The result may be empty.
pub fn convert_fields(
    data: &Map<String, Value>,
    fields: &FieldMap,
    context: &ConversionContext,
) -> Map<String, Value> {
    let mut result = Map::new();

    for (name, desc) in fields {
        match desc {
            FieldDescription::Plain(plain) => {
                if let Some(entries) = plain_field_value(data, name, plain, context) {
                    result.extend(entries);
                }
            }
            FieldDescription::Object(object) => {
                if let Some(value) = data
                    .get(name)
                    .and_then(|value| object_field_value(value, &object.properties, context))
                {
                    result.insert(name.clone(), value);
                }
            }
            FieldDescription::Search(_) => {}
        }
    }

    result
}

fn plain_field_value(
    data: &Map<String, Value>,
    name: &str,
    desc: &PlainFieldDescription,
    context: &ConversionContext,
) -> Option<Map<String, Value>> {
    if desc.not_indexed {
        return None;
    }

    let value = data
        .get(name)
        .filter(|value| !value.is_null())
        .or(desc.default_value.as_ref())
        .filter(|value| !value.is_null())?;

    Some(plain_field_entries(
        desc,
        name,
        value.clone(),
        &context.languages,
    ))
}

/// Convert the value of an object field.
///
/// A mapping converts to a mapping, a sequence converts element by element
/// with empty elements dropped, and anything else converts to nothing. Empty
/// results are `None` so no empty container reaches the document.
fn object_field_value(
    value: &Value,
    properties: &FieldMap,
    context: &ConversionContext,
) -> Option<Value> {
    match value {
        Value::Object(map) => {
            let converted = convert_fields(map, properties, context);
            (!converted.is_empty()).then_some(Value::Object(converted))
        }
        Value::Array(values) => {
            let converted: Vec<Value> = values
                .iter()
                .filter_map(|v| object_field_value(v, properties, context))
                .collect();
            (!converted.is_empty()).then_some(Value::Array(converted))
        }
        _ => None,
    }
}

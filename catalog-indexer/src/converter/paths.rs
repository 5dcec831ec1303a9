//! Dotted path lookups in resource data.

use serde_json::Value;

/// Values reachable from `data` through the dotted `path`.
///
/// An array met along the path applies the rest of the path to each of its
/// elements. A path that leads nowhere yields no values.
pub fn values_at_path<'a>(data: &'a Value, path: &str) -> Vec<&'a Value> {
    path.split('.')
        .fold(vec![data], |current, segment| {
            current
                .into_iter()
                .flat_map(|value| step(value, segment))
                .collect()
        })
}

fn step<'a>(value: &'a Value, segment: &str) -> Vec<&'a Value> {
    match value {
        Value::Object(map) => map.get(segment).into_iter().collect(),
        Value::Array(values) => values.iter().flat_map(|v| step(v, segment)).collect(),
        _ => Vec::new(),
    }
}

/// String scalars contained in `value`, flattening nested arrays.
pub fn string_values(value: &Value) -> Vec<&str> {
    match value {
        Value::String(s) => vec![s.as_str()],
        Value::Array(values) => values.iter().flat_map(string_values).collect(),
        _ => Vec::new(),
    }
}

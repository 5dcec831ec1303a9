//! Merging of computed fields into base fields.

use serde_json::{Map, Value};

/// Merge `computed` into `base` at the top level without losing combinable data.
///
/// Two sequences are concatenated (base first), two mappings are merged
/// recursively, and for any other pair the computed value replaces the base
/// value.
pub fn merge_safely(mut base: Map<String, Value>, computed: Map<String, Value>) -> Map<String, Value> {
    for (key, value) in computed {
        let merged = match base.remove(&key) {
            Some(existing) => merge_values(existing, value),
            None => value,
        };
        base.insert(key, merged);
    }
    base
}

fn merge_values(base: Value, computed: Value) -> Value {
    match (base, computed) {
        (Value::Array(mut base), Value::Array(computed)) => {
            base.extend(computed);
            Value::Array(base)
        }
        (Value::Object(base), Value::Object(computed)) => {
            Value::Object(merge_safely(base, computed))
        }
        (_, computed) => computed,
    }
}

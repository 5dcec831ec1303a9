//! Document representation of plain field values.

use serde_json::{Map, Value};

use crate::schema::PlainFieldDescription;

/// Prefix of the raw copy kept next to analyzed fields.
pub const PLAIN_FIELD_PREFIX: &str = "plain_";

/// Key holding the language-independent representation of a multilingual value.
pub const SOURCE_LANGUAGE_KEY: &str = "src";

/// Document entries produced by one plain field.
///
/// - multilingual fields: `{name: {<lang>: v, ..., "src": v}, "plain_<name>": v}`
/// - full-text fields: `{name: v, "plain_<name>": v}`
/// - any other field: `{name: v}`
pub fn plain_field_entries(
    desc: &PlainFieldDescription,
    name: &str,
    value: Value,
    languages: &[String],
) -> Map<String, Value> {
    let mut entries = Map::new();

    if desc.is_multilang() {
        let mut by_language: Map<String, Value> = languages
            .iter()
            .map(|language| (language.clone(), value.clone()))
            .collect();
        by_language.insert(SOURCE_LANGUAGE_KEY.to_string(), value.clone());

        entries.insert(name.to_string(), Value::Object(by_language));
        entries.insert(plain_field_name(name), value);
    } else if desc.has_fulltext_index() {
        entries.insert(name.to_string(), value.clone());
        entries.insert(plain_field_name(name), value);
    } else {
        entries.insert(name.to_string(), value);
    }

    entries
}

fn plain_field_name(name: &str) -> String {
    format!("{}{}", PLAIN_FIELD_PREFIX, name)
}

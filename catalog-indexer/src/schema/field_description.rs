//! Field descriptions of a resource schema.
//!
//! A field description tells the converter how one document field is derived
//! from the resource state. The variant is fixed when the description is
//! parsed:
//!
//! - `plain`: a leaf value copied from the resource (the default when `type` is absent)
//! - `object`: a nested mapping (or list of mappings) with its own field descriptions
//! - `search`: a computed field whose value is produced by a named processor

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

/// Index hint of fields expanded per language.
pub const MULTILANG_INDEX: &str = "multilang";

/// Index hint of full-text fields that also keep a raw copy.
pub const STANDARD_INDEX: &str = "standard";

/// Field descriptions keyed by field name.
pub type FieldMap = BTreeMap<String, FieldDescription>;

/// Description of how one document field is produced.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawFieldDescription")]
pub enum FieldDescription {
    /// Leaf field read from the resource.
    Plain(PlainFieldDescription),
    /// Nested field converted recursively.
    Object(ObjectFieldDescription),
    /// Computed field resolved by a search field processor.
    Search(SearchFieldDescriptor),
}

/// Leaf field read from the resource.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlainFieldDescription {
    /// Indexing hint (`keyword`, `standard`, `multilang`, ...).
    #[serde(default)]
    pub index: Option<String>,
    /// Excludes the field from the document.
    #[serde(default)]
    pub not_indexed: bool,
    /// Value used when the resource has none.
    #[serde(default)]
    pub default_value: Option<Value>,
}

impl PlainFieldDescription {
    /// A plain field with the given index hint.
    pub fn with_index(index: impl Into<String>) -> Self {
        Self {
            index: Some(index.into()),
            ..Self::default()
        }
    }

    /// Whether the field is expanded per resource language.
    pub fn is_multilang(&self) -> bool {
        self.index.as_deref() == Some(MULTILANG_INDEX)
    }

    /// Whether the field is indexed as full text.
    pub fn has_fulltext_index(&self) -> bool {
        self.index.as_deref() == Some(STANDARD_INDEX)
    }
}

/// Nested field with its own field descriptions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectFieldDescription {
    pub properties: FieldMap,
}

/// Computed field produced by a named processor.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFieldDescriptor {
    /// Name of the registered processor.
    pub processor: String,
    /// Indexing hint for the computed values.
    #[serde(default)]
    pub index: Option<String>,
}

impl SearchFieldDescriptor {
    /// A computed field resolved by `processor`.
    pub fn new(processor: impl Into<String>) -> Self {
        Self {
            processor: processor.into(),
            index: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
enum FieldKind {
    #[default]
    Plain,
    Object,
    Search,
}

/// Wire form of a field description before its variant is checked.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFieldDescription {
    #[serde(rename = "type", default)]
    kind: FieldKind,
    #[serde(default)]
    index: Option<String>,
    #[serde(default)]
    not_indexed: bool,
    #[serde(default)]
    default_value: Option<Value>,
    #[serde(default)]
    properties: Option<FieldMap>,
    #[serde(default)]
    processor: Option<String>,
}

impl TryFrom<RawFieldDescription> for FieldDescription {
    type Error = String;

    fn try_from(raw: RawFieldDescription) -> Result<Self, Self::Error> {
        match raw.kind {
            FieldKind::Plain => Ok(Self::Plain(PlainFieldDescription {
                index: raw.index,
                not_indexed: raw.not_indexed,
                default_value: raw.default_value,
            })),
            FieldKind::Object => {
                let properties = raw
                    .properties
                    .ok_or_else(|| "object field requires 'properties'".to_string())?;
                Ok(Self::Object(ObjectFieldDescription { properties }))
            }
            FieldKind::Search => {
                let processor = raw
                    .processor
                    .filter(|p| !p.trim().is_empty())
                    .ok_or_else(|| "search field requires 'processor'".to_string())?;
                Ok(Self::Search(SearchFieldDescriptor {
                    processor,
                    index: raw.index,
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> Result<FieldDescription, serde_json::Error> {
        serde_json::from_value(value)
    }

    #[test]
    fn test_missing_type_is_plain() {
        let desc = parse(json!({ "index": "keyword" })).unwrap();

        assert_eq!(
            desc,
            FieldDescription::Plain(PlainFieldDescription::with_index("keyword"))
        );
    }

    #[test]
    fn test_plain_attributes() {
        let desc = parse(json!({
            "type": "plain",
            "index": "multilang",
            "notIndexed": true,
            "defaultValue": false
        }))
        .unwrap();

        let FieldDescription::Plain(plain) = desc else {
            panic!("expected plain field");
        };
        assert!(plain.is_multilang());
        assert!(!plain.has_fulltext_index());
        assert!(plain.not_indexed);
        assert_eq!(plain.default_value, Some(json!(false)));
    }

    #[test]
    fn test_nested_object() {
        let desc = parse(json!({
            "type": "object",
            "properties": {
                "value": { "index": "keyword" },
                "notes": {
                    "type": "object",
                    "properties": { "note": { "index": "standard" } }
                }
            }
        }))
        .unwrap();

        let FieldDescription::Object(object) = desc else {
            panic!("expected object field");
        };
        assert_eq!(object.properties.len(), 2);
        assert!(matches!(
            object.properties.get("notes"),
            Some(FieldDescription::Object(_))
        ));
    }

    #[test]
    fn test_search_field() {
        let desc = parse(json!({ "type": "search", "processor": "itemTypedCallNumberProcessor" }))
            .unwrap();

        assert_eq!(
            desc,
            FieldDescription::Search(SearchFieldDescriptor::new("itemTypedCallNumberProcessor"))
        );
    }

    #[test]
    fn test_object_without_properties_is_rejected() {
        assert!(parse(json!({ "type": "object" })).is_err());
    }

    #[test]
    fn test_search_without_processor_is_rejected() {
        assert!(parse(json!({ "type": "search" })).is_err());
        assert!(parse(json!({ "type": "search", "processor": " " })).is_err());
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        assert!(parse(json!({ "type": "vector" })).is_err());
    }
}

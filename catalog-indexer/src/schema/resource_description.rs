//! Resource descriptions.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::schema::field_description::{FieldDescription, FieldMap, SearchFieldDescriptor};

/// Schema of one resource type.
///
/// Immutable once loaded. `fields` drives the recursive conversion;
/// computed fields may be declared among the top-level `fields` or in
/// `search_fields`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDescription {
    /// Resource type name (e.g. "instance").
    pub name: String,
    /// Document fields keyed by field name.
    #[serde(default)]
    pub fields: FieldMap,
    /// Additional computed fields keyed by document field name.
    #[serde(default)]
    pub search_fields: BTreeMap<String, SearchFieldDescriptor>,
    /// Dotted paths into the resource that hold language codes.
    #[serde(default)]
    pub language_source_paths: Vec<String>,
}

impl ResourceDescription {
    /// Create an empty description for `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Computed fields resolved into top-level document fields.
    ///
    /// Declarations in `search_fields` follow the top-level `fields` ones.
    pub fn computed_fields(&self) -> impl Iterator<Item = (&str, &SearchFieldDescriptor)> {
        self.fields
            .iter()
            .filter_map(|(name, desc)| match desc {
                FieldDescription::Search(search) => Some((name.as_str(), search)),
                _ => None,
            })
            .chain(
                self.search_fields
                    .iter()
                    .map(|(name, desc)| (name.as_str(), desc)),
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_description() {
        let description: ResourceDescription = serde_json::from_value(json!({
            "name": "instance",
            "languageSourcePaths": ["languages"],
            "fields": {
                "id": { "index": "keyword" },
                "callNumberKey": { "type": "search", "processor": "keyProcessor" }
            },
            "searchFields": {
                "fullCallNumbers": { "processor": "fullProcessor" }
            }
        }))
        .unwrap();

        assert_eq!(description.name, "instance");
        assert_eq!(description.language_source_paths, vec!["languages"]);
        assert_eq!(description.fields.len(), 2);

        let computed: Vec<(&str, &str)> = description
            .computed_fields()
            .map(|(name, desc)| (name, desc.processor.as_str()))
            .collect();
        assert_eq!(
            computed,
            vec![
                ("callNumberKey", "keyProcessor"),
                ("fullCallNumbers", "fullProcessor")
            ]
        );
    }

    #[test]
    fn test_empty_description() {
        let description: ResourceDescription =
            serde_json::from_value(json!({ "name": "holdings" })).unwrap();

        assert!(description.fields.is_empty());
        assert!(description.language_source_paths.is_empty());
        assert_eq!(description.computed_fields().count(), 0);
    }
}

//! Registry of resource descriptions keyed by resource type name.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::errors::{ConversionError, SchemaError};
use crate::schema::resource_description::ResourceDescription;

/// Resource descriptions bundled with the indexer.
const BUILTIN_DESCRIPTIONS: [(&str, &str); 3] = [
    (
        "instance.json",
        include_str!("../../resources/model/instance.json"),
    ),
    (
        "holdings.json",
        include_str!("../../resources/model/holdings.json"),
    ),
    ("item.json", include_str!("../../resources/model/item.json")),
];

/// Read-only registry of resource descriptions.
///
/// Populated at startup; a changed schema is published as a new registry
/// through the snapshot store, never by mutating one in place.
#[derive(Debug, Clone, Default)]
pub struct ResourceDescriptionRegistry {
    descriptions: HashMap<String, Arc<ResourceDescription>>,
}

impl ResourceDescriptionRegistry {
    /// Build a registry from descriptions, rejecting duplicate resource names.
    pub fn new(
        descriptions: impl IntoIterator<Item = ResourceDescription>,
    ) -> Result<Self, SchemaError> {
        let mut registry = Self::default();
        for description in descriptions {
            registry.insert(description)?;
        }
        Ok(registry)
    }

    /// Registry of the descriptions bundled with the indexer.
    pub fn builtin() -> Result<Self, SchemaError> {
        Self::new(
            BUILTIN_DESCRIPTIONS
                .iter()
                .map(|(origin, json)| Self::parse(origin, json))
                .collect::<Result<Vec<_>, _>>()?,
        )
    }

    /// Load every `*.json` file of `dir` as a resource description.
    ///
    /// # Arguments
    ///
    /// * `dir` - Directory holding one description per file
    ///
    /// # Returns
    ///
    /// * `Ok(ResourceDescriptionRegistry)` - The loaded registry
    /// * `Err(SchemaError)` - If a file can't be read or parsed, or names a duplicate
    pub fn load_from_dir(dir: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let dir = dir.as_ref();
        let entries = fs::read_dir(dir)
            .map_err(|e| SchemaError::Io(format!("{}: {}", dir.display(), e)))?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| SchemaError::Io(e.to_string()))?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        // Directory order is platform dependent
        paths.sort();

        let mut descriptions = Vec::with_capacity(paths.len());
        for path in paths {
            let origin = path.display().to_string();
            let json = fs::read_to_string(&path)
                .map_err(|e| SchemaError::Io(format!("{}: {}", origin, e)))?;
            descriptions.push(Self::parse(&origin, &json)?);
            debug!(file = %origin, "Loaded resource description");
        }

        let registry = Self::new(descriptions)?;
        info!(
            dir = %dir.display(),
            count = registry.len(),
            "Loaded resource descriptions"
        );
        Ok(registry)
    }

    fn parse(origin: &str, json: &str) -> Result<ResourceDescription, SchemaError> {
        serde_json::from_str(json).map_err(|e| SchemaError::parse(origin, e.to_string()))
    }

    fn insert(&mut self, description: ResourceDescription) -> Result<(), SchemaError> {
        if self.descriptions.contains_key(&description.name) {
            return Err(SchemaError::Duplicate(description.name));
        }
        self.descriptions
            .insert(description.name.clone(), Arc::new(description));
        Ok(())
    }

    /// Get the description of a resource type.
    ///
    /// # Returns
    ///
    /// * `Ok(Arc<ResourceDescription>)` - The registered description
    /// * `Err(ConversionError::SchemaNotFound)` - If the type is not registered
    pub fn get(&self, resource_name: &str) -> Result<Arc<ResourceDescription>, ConversionError> {
        self.descriptions
            .get(resource_name)
            .cloned()
            .ok_or_else(|| ConversionError::schema_not_found(resource_name))
    }

    /// Check that every computed field names a registered processor.
    pub fn validate_processors(
        &self,
        is_registered: impl Fn(&str) -> bool,
    ) -> Result<(), SchemaError> {
        for description in self.descriptions.values() {
            for (field, desc) in description.computed_fields() {
                if !is_registered(&desc.processor) {
                    return Err(SchemaError::UnknownProcessor {
                        resource: description.name.clone(),
                        field: field.to_string(),
                        processor: desc.processor.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Registered resource type names.
    pub fn resource_names(&self) -> impl Iterator<Item = &str> {
        self.descriptions.keys().map(String::as_str)
    }

    /// Number of registered descriptions.
    pub fn len(&self) -> usize {
        self.descriptions.len()
    }

    /// Whether no description is registered.
    pub fn is_empty(&self) -> bool {
        self.descriptions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::field_description::SearchFieldDescriptor;

    #[test]
    fn test_get_registered_description() {
        let registry =
            ResourceDescriptionRegistry::new([ResourceDescription::new("instance")]).unwrap();

        let description = registry.get("instance").unwrap();

        assert_eq!(description.name, "instance");
    }

    #[test]
    fn test_get_unknown_description() {
        let registry = ResourceDescriptionRegistry::default();

        let result = registry.get("authority");

        assert_eq!(
            result.unwrap_err(),
            ConversionError::SchemaNotFound("authority".to_string())
        );
    }

    #[test]
    fn test_duplicate_description() {
        let result = ResourceDescriptionRegistry::new([
            ResourceDescription::new("item"),
            ResourceDescription::new("item"),
        ]);

        assert_eq!(
            result.unwrap_err(),
            SchemaError::Duplicate("item".to_string())
        );
    }

    #[test]
    fn test_builtin_descriptions() {
        let registry = ResourceDescriptionRegistry::builtin().unwrap();

        assert_eq!(registry.len(), 3);
        assert!(registry.get("instance").is_ok());
        assert!(registry.get("holdings").is_ok());
        assert!(registry.get("item").is_ok());
    }

    #[test]
    fn test_validate_processors() {
        let mut description = ResourceDescription::new("instance");
        description.search_fields.insert(
            "callNumberKey".to_string(),
            SearchFieldDescriptor::new("missingProcessor"),
        );
        let registry = ResourceDescriptionRegistry::new([description]).unwrap();

        assert!(registry.validate_processors(|_| true).is_ok());
        assert_eq!(
            registry.validate_processors(|_| false).unwrap_err(),
            SchemaError::UnknownProcessor {
                resource: "instance".to_string(),
                field: "callNumberKey".to_string(),
                processor: "missingProcessor".to_string(),
            }
        );
    }

    #[test]
    fn test_load_from_missing_dir() {
        let result = ResourceDescriptionRegistry::load_from_dir("/nonexistent/model/dir");

        assert!(matches!(result, Err(SchemaError::Io(_))));
    }

    #[test]
    fn test_load_from_dir() {
        let dir = std::env::temp_dir().join(format!("catalog-model-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("item.json"),
            r#"{"name": "item", "fields": {"barcode": {"index": "keyword"}}}"#,
        )
        .unwrap();
        fs::write(dir.join("README.txt"), "not a description").unwrap();

        let registry = ResourceDescriptionRegistry::load_from_dir(&dir).unwrap();
        fs::remove_dir_all(&dir).unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("item").unwrap().fields.len(), 1);
    }
}

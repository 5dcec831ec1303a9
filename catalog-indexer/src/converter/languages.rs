//! Multilingual resolver.
//!
//! Determines which of the supported languages apply to one resource.

use std::collections::HashSet;

use serde_json::Value;

use crate::converter::paths::{string_values, values_at_path};

/// Resolve the languages of a resource.
///
/// Collects the strings found at every source path, keeps the distinct ones
/// that are supported and returns them in the order first encountered. An
/// empty result means no multilingual expansion for this resource.
///
/// # Arguments
///
/// * `source_paths` - Dotted paths holding language codes
/// * `resource_data` - The resource state
/// * `supported_languages` - Language codes currently supported
pub fn resolve_languages(
    source_paths: &[String],
    resource_data: &Value,
    supported_languages: &HashSet<String>,
) -> Vec<String> {
    let mut seen = HashSet::new();
    source_paths
        .iter()
        .flat_map(|path| values_at_path(resource_data, path))
        .flat_map(string_values)
        .filter(|code| supported_languages.contains(*code))
        .filter(|code| seen.insert(*code))
        .map(str::to_string)
        .collect()
}

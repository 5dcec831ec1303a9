//! Per-event conversion context.

use std::sync::Arc;

use catalog_indexer_shared::ResourceEventType;
use serde_json::{Map, Value};

use crate::schema::ResourceDescription;

/// Everything one event's conversion reads.
///
/// Created fresh per event and never shared with another conversion.
#[derive(Debug, Clone)]
pub struct ConversionContext {
    /// Resource identifier.
    pub id: String,
    /// Tenant identifier.
    pub tenant: String,
    /// Kind of the source event.
    pub event_type: ResourceEventType,
    /// Current resource state.
    pub resource_data: Map<String, Value>,
    /// Schema of the resource type.
    pub resource_description: Arc<ResourceDescription>,
    /// Resource languages that are also supported, in first-encounter order.
    pub languages: Vec<String>,
}

impl ConversionContext {
    /// Resource type name.
    pub fn resource_name(&self) -> &str {
        &self.resource_description.name
    }
}

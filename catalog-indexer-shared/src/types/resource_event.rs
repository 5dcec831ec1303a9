//! Resource change event types.
//!
//! A resource event describes one change of a catalog resource (instance,
//! holding, item) together with its current state.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Kind of change a resource event carries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceEventType {
    /// Resource was created.
    Create,
    /// Resource was updated.
    Update,
    /// Resource was deleted.
    Delete,
    /// Current state re-sent during a reindex.
    Reindex,
}

impl ResourceEventType {
    /// Whether the event writes the resource state into the index.
    pub fn is_upsert(&self) -> bool {
        !matches!(self, Self::Delete)
    }
}

/// A change event for one catalog resource.
///
/// # Fields
///
/// - `id`: Resource identifier
/// - `event_type`: The kind of change
/// - `tenant`: Tenant the resource belongs to
/// - `resource_name`: Resource type name (e.g. "instance")
/// - `new`: Current resource state, absent for deletes
/// - `old`: Previous resource state, if the source provides it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResourceEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: ResourceEventType,
    pub tenant: String,
    pub resource_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old: Option<Value>,
}

impl ResourceEvent {
    /// Create a new create event carrying the given state.
    pub fn create(
        id: impl Into<String>,
        tenant: impl Into<String>,
        resource_name: impl Into<String>,
        new: Value,
    ) -> Self {
        Self::with_state(ResourceEventType::Create, id, tenant, resource_name, new)
    }

    /// Create a new update event carrying the given state.
    pub fn update(
        id: impl Into<String>,
        tenant: impl Into<String>,
        resource_name: impl Into<String>,
        new: Value,
    ) -> Self {
        Self::with_state(ResourceEventType::Update, id, tenant, resource_name, new)
    }

    /// Create a new delete event. Deletes carry no state.
    pub fn delete(
        id: impl Into<String>,
        tenant: impl Into<String>,
        resource_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            event_type: ResourceEventType::Delete,
            tenant: tenant.into(),
            resource_name: resource_name.into(),
            new: None,
            old: None,
        }
    }

    fn with_state(
        event_type: ResourceEventType,
        id: impl Into<String>,
        tenant: impl Into<String>,
        resource_name: impl Into<String>,
        new: Value,
    ) -> Self {
        Self {
            id: id.into(),
            event_type,
            tenant: tenant.into(),
            resource_name: resource_name.into(),
            new: Some(new),
            old: None,
        }
    }
}

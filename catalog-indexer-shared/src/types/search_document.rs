//! Search document types handed to the indexing sink.
//!
//! This module defines the document body that is written to (or removed from)
//! the search engine.

use serde::{Deserialize, Serialize};

use crate::types::resource_event::{ResourceEvent, ResourceEventType};

/// Operation the indexing sink performs for a document body.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IndexActionType {
    /// Create or replace the document.
    Index,
    /// Remove the document.
    Delete,
}

impl From<ResourceEventType> for IndexActionType {
    fn from(event_type: ResourceEventType) -> Self {
        if event_type.is_upsert() {
            Self::Index
        } else {
            Self::Delete
        }
    }
}

/// Document body for the search index.
///
/// # Fields
///
/// - `id`: Resource identifier, used as the document id
/// - `tenant`: Tenant the resource belongs to
/// - `index`: Target index name
/// - `event_type`: Kind of the source event
/// - `action`: Operation the sink performs
/// - `payload`: Serialized JSON document, absent for deletes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchDocumentBody {
    pub id: String,
    pub tenant: String,
    pub index: String,
    pub event_type: ResourceEventType,
    pub action: IndexActionType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
}

impl SearchDocumentBody {
    /// Create a document body that writes `payload` into `index`.
    ///
    /// # Arguments
    ///
    /// * `id` - The resource identifier
    /// * `tenant` - The tenant identifier
    /// * `index` - The target index name
    /// * `event_type` - The kind of the source event
    /// * `payload` - The serialized JSON document
    pub fn for_upsert(
        id: impl Into<String>,
        tenant: impl Into<String>,
        index: impl Into<String>,
        event_type: ResourceEventType,
        payload: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            tenant: tenant.into(),
            index: index.into(),
            event_type,
            action: IndexActionType::Index,
            payload: Some(payload.into()),
        }
    }

    /// Create a document body that removes the event's resource from `index`.
    ///
    /// # Example
    ///
    /// ```
    /// use catalog_indexer_shared::{IndexActionType, ResourceEvent, SearchDocumentBody};
    ///
    /// let event = ResourceEvent::delete("id-1", "diku", "item");
    /// let body = SearchDocumentBody::for_delete(&event, "catalog_item_diku");
    ///
    /// assert_eq!(body.action, IndexActionType::Delete);
    /// assert!(body.payload.is_none());
    /// ```
    pub fn for_delete(event: &ResourceEvent, index: impl Into<String>) -> Self {
        Self {
            id: event.id.clone(),
            tenant: event.tenant.clone(),
            index: index.into(),
            event_type: event.event_type,
            action: IndexActionType::Delete,
            payload: None,
        }
    }

    /// Whether this body writes a document.
    pub fn is_index(&self) -> bool {
        self.action == IndexActionType::Index
    }
}

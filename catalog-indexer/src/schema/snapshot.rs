//! Immutable configuration snapshots shared by concurrent conversions.
//!
//! A conversion takes the current snapshot once when it starts and keeps it
//! until it finishes. Reloads build a new snapshot and swap the `Arc`, so an
//! in-flight conversion never observes a partially updated schema or language
//! set.

use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock};

use catalog_indexer_repository::{LanguageConfigProvider, ReferenceDataError};
use tracing::info;

use crate::schema::registry::ResourceDescriptionRegistry;

/// Schema and language configuration as seen by one conversion.
#[derive(Debug, Clone, Default)]
pub struct ConversionSnapshot {
    /// Registered resource descriptions.
    pub descriptions: Arc<ResourceDescriptionRegistry>,
    /// Language codes currently supported for the tenant-wide configuration.
    pub supported_languages: Arc<HashSet<String>>,
}

impl ConversionSnapshot {
    /// Create a snapshot from a registry and a set of supported languages.
    pub fn new(
        descriptions: ResourceDescriptionRegistry,
        supported_languages: HashSet<String>,
    ) -> Self {
        Self {
            descriptions: Arc::new(descriptions),
            supported_languages: Arc::new(supported_languages),
        }
    }
}

/// Holder of the current snapshot.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    current: RwLock<Arc<ConversionSnapshot>>,
}

impl SnapshotStore {
    /// Create a store publishing `snapshot`.
    pub fn new(snapshot: ConversionSnapshot) -> Self {
        Self {
            current: RwLock::new(Arc::new(snapshot)),
        }
    }

    /// The snapshot to use for a conversion that starts now.
    pub fn current(&self) -> Arc<ConversionSnapshot> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Publish a new snapshot.
    pub fn replace(&self, snapshot: ConversionSnapshot) {
        *self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Arc::new(snapshot);
    }

    /// Publish a snapshot with new resource descriptions and the current languages.
    pub fn replace_descriptions(&self, descriptions: ResourceDescriptionRegistry) {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *current = Arc::new(ConversionSnapshot {
            descriptions: Arc::new(descriptions),
            supported_languages: current.supported_languages.clone(),
        });
    }

    /// Publish a snapshot with new supported languages and the current descriptions.
    pub fn replace_languages(&self, supported_languages: HashSet<String>) {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *current = Arc::new(ConversionSnapshot {
            descriptions: current.descriptions.clone(),
            supported_languages: Arc::new(supported_languages),
        });
    }

    /// Reload the supported languages from the language configuration.
    ///
    /// On failure the current snapshot stays published.
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - Number of supported languages now published
    /// * `Err(ReferenceDataError)` - If the configuration could not be read
    pub async fn refresh_languages(
        &self,
        provider: &dyn LanguageConfigProvider,
    ) -> Result<usize, ReferenceDataError> {
        let languages = provider.supported_language_codes().await?;
        let count = languages.len();
        self.replace_languages(languages);
        info!(language_count = count, "Refreshed supported languages");
        Ok(count)
    }
}

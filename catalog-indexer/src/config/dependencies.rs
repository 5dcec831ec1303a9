//! Dependency initialization and wiring for the catalog indexer.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::config::settings::{ConnectionMode, IndexerSettings};
use crate::consumer::JsonLinesConsumer;
use crate::converter::SearchDocumentConverter;
use crate::loader::{LoaderConfig, SearchLoader};
use crate::orchestrator::Orchestrator;
use crate::processor::ResourceEventProcessor;
use crate::schema::{ConversionSnapshot, ResourceDescriptionRegistry, SnapshotStore};
use crate::search_fields::{SearchFieldProcessorRegistry, SearchFieldsProcessor};
use crate::IndexingError;
use catalog_indexer_repository::{
    LanguageConfigProvider, OpenSearchProvider, StaticLanguageConfig, StaticReferenceData,
};

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured orchestrator ready to run.
    pub orchestrator: Orchestrator,
}

impl Dependencies {
    /// Initialize all dependencies from environment variables.
    ///
    /// See [`IndexerSettings::from_env`] for the variables read.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(IndexingError)` - If the schema is invalid or OpenSearch is
    ///   unreachable in fail-fast mode
    pub async fn new() -> Result<Self, IndexingError> {
        Self::from_settings(IndexerSettings::from_env()).await
    }

    /// Initialize all dependencies from `settings`.
    pub async fn from_settings(settings: IndexerSettings) -> Result<Self, IndexingError> {
        info!(
            opensearch_url = %settings.opensearch_url,
            connection_mode = ?settings.connection_mode,
            retry_interval_secs = settings.retry_interval.as_secs(),
            index_env = %settings.index_env,
            events_file = %settings.events_file.display(),
            "Initializing dependencies"
        );

        let descriptions = match &settings.resource_descriptions_dir {
            Some(dir) => ResourceDescriptionRegistry::load_from_dir(dir),
            None => ResourceDescriptionRegistry::builtin(),
        }
        .map_err(|e| IndexingError::config(format!("Invalid resource descriptions: {}", e)))?;

        let reference_data = StaticReferenceData::new()
            .with_local_call_number_types(settings.local_call_number_types.iter().cloned());
        let processors = SearchFieldProcessorRegistry::with_defaults(Arc::new(reference_data));
        descriptions
            .validate_processors(|name| processors.contains(name))
            .map_err(|e| IndexingError::config(e.to_string()))?;

        let language_config: Arc<dyn LanguageConfigProvider> =
            Arc::new(StaticLanguageConfig::from_csv(&settings.supported_languages));
        let supported_languages: HashSet<String> = language_config
            .supported_language_codes()
            .await
            .map_err(|e| IndexingError::config(format!("Failed to read languages: {}", e)))?;

        info!(
            resource_count = descriptions.len(),
            language_count = supported_languages.len(),
            "Loaded conversion configuration"
        );

        let snapshots = Arc::new(SnapshotStore::new(ConversionSnapshot::new(
            descriptions,
            supported_languages,
        )));
        let converter = SearchDocumentConverter::new(
            snapshots.clone(),
            SearchFieldsProcessor::new(Arc::new(processors)),
            settings.index_env.clone(),
        );
        let processor = ResourceEventProcessor::new(converter);

        let search_provider = Self::connect_to_opensearch(
            &settings.opensearch_url,
            settings.connection_mode,
            settings.retry_interval,
        )
        .await?;

        info!("OpenSearch connection established");

        let loader = SearchLoader::with_config(
            Arc::new(search_provider),
            LoaderConfig {
                batch_size: settings.loader_batch_size,
            },
        );

        let consumer = Arc::new(JsonLinesConsumer::with_batch_size(
            &settings.events_file,
            settings.consumer_batch_size,
        ));

        let mut orchestrator = Orchestrator::new(consumer, processor, loader);
        if let Some(interval) = settings.language_refresh_interval {
            orchestrator = orchestrator.with_language_refresh(snapshots, language_config, interval);
        }

        Ok(Self { orchestrator })
    }

    /// Connect to OpenSearch with retry logic based on connection mode.
    async fn connect_to_opensearch(
        url: &str,
        mode: ConnectionMode,
        retry_interval: Duration,
    ) -> Result<OpenSearchProvider, IndexingError> {
        loop {
            match OpenSearchProvider::new(url).await {
                Ok(provider) => return Ok(provider),
                Err(e) => match mode {
                    ConnectionMode::FailFast => {
                        return Err(IndexingError::config(format!(
                            "Failed to connect to OpenSearch: {}",
                            e
                        )));
                    }
                    ConnectionMode::Retry => {
                        warn!(
                            opensearch_url = %url,
                            error = %e,
                            retry_interval_secs = retry_interval.as_secs(),
                            "Failed to connect to OpenSearch, retrying..."
                        );
                        sleep(retry_interval).await;
                    }
                },
            }
        }
    }
}

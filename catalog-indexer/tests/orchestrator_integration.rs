//! Integration tests for the catalog indexer orchestrator.
//!
//! These tests use the real Orchestrator, processor and converter but mock
//! the event source and the SearchIndexProvider.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tokio::time::timeout;

use catalog_indexer::consumer::{Consumer, JsonLinesConsumer, StreamMessage};
use catalog_indexer::converter::SearchDocumentConverter;
use catalog_indexer::errors::IngestError;
use catalog_indexer::loader::SearchLoader;
use catalog_indexer::orchestrator::{Orchestrator, OrchestratorConfig};
use catalog_indexer::processor::ResourceEventProcessor;
use catalog_indexer::schema::{ConversionSnapshot, ResourceDescriptionRegistry, SnapshotStore};
use catalog_indexer::search_fields::{SearchFieldProcessorRegistry, SearchFieldsProcessor};
use catalog_indexer_repository::{
    BatchOperationResult, BatchOperationSummary, SearchIndexError, SearchIndexProvider,
    StaticLanguageConfig, StaticReferenceData,
};
use catalog_indexer_shared::{ResourceEvent, SearchDocumentBody};
use serde_json::{json, Value};
use uuid::Uuid;

// Mock Consumer for testing
struct MockConsumer {
    events_to_send: Vec<ResourceEvent>,
    error_on_subscribe: bool,
    acknowledged: Mutex<Option<bool>>,
}

impl MockConsumer {
    fn new(events: Vec<ResourceEvent>) -> Self {
        Self {
            events_to_send: events,
            error_on_subscribe: false,
            acknowledged: Mutex::new(None),
        }
    }

    fn with_subscribe_error(events: Vec<ResourceEvent>) -> Self {
        Self {
            error_on_subscribe: true,
            ..Self::new(events)
        }
    }

    fn acknowledged(&self) -> Option<bool> {
        *self.acknowledged.lock().unwrap()
    }
}

#[async_trait::async_trait]
impl Consumer for MockConsumer {
    fn subscribe(&self) -> Result<(), IngestError> {
        if self.error_on_subscribe {
            Err(IngestError::consumer("Mock subscribe error"))
        } else {
            Ok(())
        }
    }

    async fn run(
        &self,
        sender: mpsc::Sender<StreamMessage>,
        mut ack_receiver: mpsc::Receiver<StreamMessage>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), IngestError> {
        let events = self.events_to_send.clone();
        let offsets = (1..=events.len() as u64).collect();

        let _ = sender.send(StreamMessage::Events { events, offsets }).await;
        let _ = sender.send(StreamMessage::End).await;

        tokio::select! {
            _ = shutdown.recv() => {}
            ack = ack_receiver.recv() => {
                if let Some(StreamMessage::Acknowledgment { success, .. }) = ack {
                    *self.acknowledged.lock().unwrap() = Some(success);
                }
            }
        }

        Ok(())
    }
}

// Consumer sending several batches and recording every acknowledgment
struct BatchConsumer {
    batches: Vec<Vec<ResourceEvent>>,
    acknowledgments: Mutex<Vec<(Vec<u64>, bool)>>,
}

impl BatchConsumer {
    fn new(batches: Vec<Vec<ResourceEvent>>) -> Self {
        Self {
            batches,
            acknowledgments: Mutex::new(Vec::new()),
        }
    }

    fn acknowledgments(&self) -> Vec<(Vec<u64>, bool)> {
        self.acknowledgments.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Consumer for BatchConsumer {
    fn subscribe(&self) -> Result<(), IngestError> {
        Ok(())
    }

    async fn run(
        &self,
        sender: mpsc::Sender<StreamMessage>,
        mut ack_receiver: mpsc::Receiver<StreamMessage>,
        _shutdown: broadcast::Receiver<()>,
    ) -> Result<(), IngestError> {
        let mut next_offset = 1;
        for events in &self.batches {
            let offsets: Vec<u64> = (next_offset..next_offset + events.len() as u64).collect();
            next_offset += events.len() as u64;
            let _ = sender
                .send(StreamMessage::Events {
                    events: events.clone(),
                    offsets,
                })
                .await;
            if let Some(StreamMessage::Acknowledgment { offsets, success, .. }) =
                ack_receiver.recv().await
            {
                self.acknowledgments.lock().unwrap().push((offsets, success));
            }
        }
        let _ = sender.send(StreamMessage::End).await;
        while let Some(message) = ack_receiver.recv().await {
            if let StreamMessage::Acknowledgment { offsets, success, .. } = message {
                self.acknowledgments.lock().unwrap().push((offsets, success));
            }
        }
        Ok(())
    }
}

// Mock Search Provider for testing
#[derive(Default)]
struct MockSearchProvider {
    indexed_documents: Mutex<Vec<SearchDocumentBody>>,
    deleted_documents: Mutex<Vec<SearchDocumentBody>>,
    fail_bulk: bool,
    bulk_failures_left: Mutex<usize>,
}

impl MockSearchProvider {
    fn indexed(&self) -> Vec<SearchDocumentBody> {
        self.indexed_documents.lock().unwrap().clone()
    }

    fn deleted(&self) -> Vec<SearchDocumentBody> {
        self.deleted_documents.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl SearchIndexProvider for MockSearchProvider {
    async fn bulk_index_documents(
        &self,
        documents: &[SearchDocumentBody],
    ) -> Result<BatchOperationSummary, SearchIndexError> {
        if self.fail_bulk {
            return Err(SearchIndexError::bulk_request_failed("Mock bulk failure"));
        }
        {
            let mut failures_left = self.bulk_failures_left.lock().unwrap();
            if *failures_left > 0 {
                *failures_left -= 1;
                return Err(SearchIndexError::unreachable("Mock transient failure"));
            }
        }
        self.indexed_documents
            .lock()
            .unwrap()
            .extend(documents.iter().cloned());

        Ok(BatchOperationSummary::from_results(
            documents
                .iter()
                .map(|d| BatchOperationResult::succeeded(d.id.clone(), d.index.clone()))
                .collect(),
        ))
    }

    async fn delete_document(&self, document: &SearchDocumentBody) -> Result<(), SearchIndexError> {
        self.deleted_documents.lock().unwrap().push(document.clone());
        Ok(())
    }
}

fn snapshots() -> Arc<SnapshotStore> {
    Arc::new(SnapshotStore::new(ConversionSnapshot::new(
        ResourceDescriptionRegistry::builtin().unwrap(),
        HashSet::from(["eng".to_string()]),
    )))
}

fn processor(snapshots: Arc<SnapshotStore>) -> ResourceEventProcessor {
    let registry = SearchFieldProcessorRegistry::with_defaults(Arc::new(
        StaticReferenceData::new().with_local_call_number_types(["local-type"]),
    ));
    ResourceEventProcessor::new(SearchDocumentConverter::new(
        snapshots,
        SearchFieldsProcessor::new(Arc::new(registry)),
        "catalog",
    ))
}

/// Helper to create a test orchestrator with mocked dependencies
fn create_test_orchestrator(
    consumer: Arc<dyn Consumer>,
    provider: Arc<MockSearchProvider>,
) -> Orchestrator {
    let loader = SearchLoader::new(provider);
    Orchestrator::new(consumer, processor(snapshots()), loader)
}

fn instance_event(title: &str) -> ResourceEvent {
    let id = Uuid::new_v4().to_string();
    ResourceEvent::create(
        id.clone(),
        "diku",
        "instance",
        json!({ "id": id, "title": title, "languages": ["eng"] }),
    )
}

fn payload(document: &SearchDocumentBody) -> Value {
    serde_json::from_str(document.payload.as_deref().unwrap()).unwrap()
}

#[tokio::test]
async fn test_orchestrator_full_integration() {
    let events = vec![instance_event("First"), instance_event("Second")];
    let consumer = Arc::new(MockConsumer::new(events));
    let provider = Arc::new(MockSearchProvider::default());
    let mut orchestrator = create_test_orchestrator(consumer.clone(), provider.clone());

    let result = timeout(Duration::from_secs(5), orchestrator.run()).await;

    assert!(result.is_ok());
    assert!(result.unwrap().is_ok());

    let indexed = provider.indexed();
    assert_eq!(indexed.len(), 2);
    assert_eq!(indexed[0].index, "catalog_instance_diku");
    assert_eq!(payload(&indexed[0])["title"], json!({ "eng": "First", "src": "First" }));
    assert_eq!(consumer.acknowledged(), Some(true));
    assert_eq!(orchestrator.total_events_processed(), 2);
    assert_eq!(orchestrator.total_documents_indexed(), 2);
}

#[tokio::test]
async fn test_orchestrator_with_delete_events() {
    let events = vec![
        ResourceEvent::delete("item-1", "diku", "item"),
        ResourceEvent::delete("holdings-1", "diku", "holdings"),
    ];
    let consumer = Arc::new(MockConsumer::new(events));
    let provider = Arc::new(MockSearchProvider::default());
    let mut orchestrator = create_test_orchestrator(consumer, provider.clone());

    let result = timeout(Duration::from_secs(5), orchestrator.run()).await;
    assert!(result.is_ok());
    assert!(result.unwrap().is_ok());

    let deleted = provider.deleted();
    assert_eq!(deleted.len(), 2);
    assert_eq!(deleted[0].index, "catalog_item_diku");
    assert_eq!(deleted[1].index, "catalog_holdings_diku");
    assert!(provider.indexed().is_empty());
}

#[tokio::test]
async fn test_unconvertible_events_are_acknowledged() {
    let events = vec![
        ResourceEvent::create("a-1", "diku", "authority", json!({ "id": "a-1" })),
        ResourceEvent::update("i-1", "diku", "instance", json!("not an object")),
        instance_event("Valid"),
    ];
    let consumer = Arc::new(MockConsumer::new(events));
    let provider = Arc::new(MockSearchProvider::default());
    let mut orchestrator = create_test_orchestrator(consumer.clone(), provider.clone());

    let result = timeout(Duration::from_secs(5), orchestrator.run()).await;
    assert!(result.unwrap().is_ok());

    assert_eq!(provider.indexed().len(), 1);
    assert_eq!(consumer.acknowledged(), Some(true));
}

#[tokio::test]
async fn test_failed_bulk_request_is_not_acknowledged() {
    let consumer = Arc::new(MockConsumer::new(vec![instance_event("Title")]));
    let provider = Arc::new(MockSearchProvider {
        fail_bulk: true,
        ..Default::default()
    });
    let mut orchestrator = create_test_orchestrator(consumer.clone(), provider);

    let result = timeout(Duration::from_secs(5), orchestrator.run()).await;
    assert!(result.unwrap().is_ok());

    assert_eq!(consumer.acknowledged(), Some(false));
    assert_eq!(orchestrator.total_documents_indexed(), 0);
}

#[tokio::test]
async fn test_documents_of_failed_batch_are_written_by_next_batch() {
    let first = instance_event("First");
    let second = instance_event("Second");
    let consumer = Arc::new(BatchConsumer::new(vec![vec![first.clone()], vec![second.clone()]]));
    let provider = Arc::new(MockSearchProvider {
        bulk_failures_left: Mutex::new(1),
        ..Default::default()
    });
    let mut orchestrator = create_test_orchestrator(consumer.clone(), provider.clone());

    let result = timeout(Duration::from_secs(5), orchestrator.run()).await;
    assert!(result.unwrap().is_ok());

    let indexed: Vec<String> = provider.indexed().iter().map(|d| d.id.clone()).collect();
    assert_eq!(indexed, vec![first.id, second.id]);
    assert_eq!(
        consumer.acknowledgments(),
        vec![(vec![1], false), (vec![2, 1], true)]
    );
    assert_eq!(orchestrator.total_documents_indexed(), 2);
}

#[tokio::test]
async fn test_failed_batch_is_retried_before_exit() {
    let event = instance_event("Only");
    let consumer = Arc::new(BatchConsumer::new(vec![vec![event.clone()]]));
    let provider = Arc::new(MockSearchProvider {
        bulk_failures_left: Mutex::new(1),
        ..Default::default()
    });
    let mut orchestrator = create_test_orchestrator(consumer.clone(), provider.clone());

    let result = timeout(Duration::from_secs(5), orchestrator.run()).await;
    assert!(result.unwrap().is_ok());

    assert_eq!(provider.indexed().len(), 1);
    assert_eq!(
        consumer.acknowledgments(),
        vec![(vec![1], false), (vec![1], true)]
    );
}

#[tokio::test]
async fn test_orchestrator_configuration() {
    let provider = Arc::new(MockSearchProvider::default());
    let consumer = Arc::new(MockConsumer::new(vec![instance_event("Title")]));
    let snapshots = snapshots();

    let config = OrchestratorConfig {
        channel_buffer_size: 2000,
        progress_interval: Duration::from_secs(1),
    };

    let mut orchestrator = Orchestrator::with_config(
        consumer,
        processor(snapshots.clone()),
        SearchLoader::new(provider.clone()),
        config,
    )
    .with_language_refresh(
        snapshots,
        Arc::new(StaticLanguageConfig::from_csv("eng,fra")),
        Duration::from_secs(60),
    );

    let result = timeout(Duration::from_secs(5), orchestrator.run()).await;
    assert!(result.unwrap().is_ok());
    assert_eq!(provider.indexed().len(), 1);
}

#[tokio::test]
async fn test_empty_event_batch_processing() {
    let consumer = Arc::new(MockConsumer::new(vec![]));
    let provider = Arc::new(MockSearchProvider::default());
    let mut orchestrator = create_test_orchestrator(consumer.clone(), provider.clone());

    let result = timeout(Duration::from_secs(5), orchestrator.run()).await;
    assert!(result.is_ok());
    assert!(result.unwrap().is_ok());

    assert!(provider.indexed().is_empty());
    assert_eq!(consumer.acknowledged(), Some(true));
}

#[tokio::test]
async fn test_orchestrator_with_events_file() {
    let path = std::env::temp_dir().join(format!("catalog-events-{}.jsonl", Uuid::new_v4()));
    let lines = [
        json!({
            "id": "instance-1",
            "type": "CREATE",
            "tenant": "diku",
            "resourceName": "instance",
            "new": {
                "id": "instance-1",
                "title": "Web semantics",
                "items": [{
                    "effectiveShelvingOrder": "HD 11",
                    "itemLevelCallNumberTypeId": "95467209-6d7b-468b-94df-0f5d7ad2747d",
                    "effectiveCallNumberComponents": { "callNumber": "HD 11" }
                }]
            }
        }),
        json!({ "id": "item-9", "type": "DELETE", "tenant": "diku", "resourceName": "item" }),
    ];
    let content: String = lines.iter().map(|line| format!("{}\n", line)).collect();
    std::fs::write(&path, content).unwrap();

    let consumer = Arc::new(JsonLinesConsumer::new(&path));
    let provider = Arc::new(MockSearchProvider::default());
    let mut orchestrator = create_test_orchestrator(consumer.clone(), provider.clone());

    let result = timeout(Duration::from_secs(5), orchestrator.run()).await;
    std::fs::remove_file(&path).unwrap();
    assert!(result.unwrap().is_ok());

    let indexed = provider.indexed();
    assert_eq!(indexed.len(), 1);
    let document = payload(&indexed[0]);
    assert_eq!(document["itemFullCallNumbers"], json!(["HD 11"]));
    assert_eq!(document["itemTypedCallNumbers"].as_array().unwrap().len(), 1);
    assert_eq!(provider.deleted().len(), 1);
    assert_eq!(consumer.committed_offset(), 2);
}

#[tokio::test]
async fn test_orchestrator_shutdown() {
    use tokio::sync::Mutex;

    let consumer = Arc::new(MockConsumer::new(vec![instance_event("Title")]));
    let provider = Arc::new(MockSearchProvider::default());
    let orchestrator = Arc::new(Mutex::new(create_test_orchestrator(consumer, provider)));

    let orchestrator_clone = Arc::clone(&orchestrator);
    let shutdown_handle = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        let orchestrator = orchestrator_clone.lock().await;
        orchestrator.shutdown();
    });

    let orchestrator_run_clone = Arc::clone(&orchestrator);
    let orchestrator_handle = tokio::spawn(async move {
        let mut orchestrator = orchestrator_run_clone.lock().await;
        orchestrator.run().await
    });

    let (shutdown_result, orchestrator_result) = tokio::join!(shutdown_handle, orchestrator_handle);

    assert!(shutdown_result.is_ok(), "Shutdown task should succeed");
    assert!(
        orchestrator_result.unwrap().is_ok(),
        "Orchestrator should complete successfully"
    );
}

#[tokio::test]
async fn test_orchestrator_error_handling() {
    let consumer = Arc::new(MockConsumer::with_subscribe_error(vec![instance_event(
        "Title",
    )]));
    let provider = Arc::new(MockSearchProvider::default());
    let mut orchestrator = create_test_orchestrator(consumer, provider.clone());

    let result = timeout(Duration::from_secs(5), orchestrator.run()).await;
    assert!(result.is_ok(), "Orchestrator should complete");

    match result.unwrap() {
        Err(IngestError::ConsumerError(msg)) => assert_eq!(msg, "Mock subscribe error"),
        other => panic!("Expected ConsumerError, got {:?}", other),
    }
    assert!(provider.indexed().is_empty());
}

//! Orchestrator module for the catalog indexer ingest.
//!
//! Coordinates the consumer, processor, and loader components.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tokio::time::{interval, Duration, Interval, MissedTickBehavior};
use tracing::{debug, error, info, instrument, warn};

use crate::consumer::{Consumer, StreamMessage};
use crate::errors::IngestError;
use crate::loader::SearchLoader;
use crate::processor::ResourceEventProcessor;
use crate::schema::SnapshotStore;
use catalog_indexer_repository::LanguageConfigProvider;
use catalog_indexer_shared::ResourceEvent;

/// Configuration for the orchestrator.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Size of the message channel buffer.
    pub channel_buffer_size: usize,
    /// Interval of the progress log.
    pub progress_interval: Duration,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            channel_buffer_size: 1000,
            progress_interval: Duration::from_secs(10),
        }
    }
}

/// Periodic reload of the supported languages.
struct LanguageRefresh {
    snapshots: Arc<SnapshotStore>,
    provider: Arc<dyn LanguageConfigProvider>,
    interval: Duration,
}

/// Orchestrator that coordinates the ingest components.
///
/// The orchestrator:
/// - Manages the lifecycle of ingest components
/// - Routes messages between components
/// - Acknowledges batches once their documents are written
/// - Refreshes the language configuration out of band
/// - Handles shutdown signals
pub struct Orchestrator {
    consumer: Arc<dyn Consumer>,
    processor: ResourceEventProcessor,
    loader: SearchLoader,
    config: OrchestratorConfig,
    language_refresh: Option<LanguageRefresh>,
    shutdown_tx: broadcast::Sender<()>,
    /// Total number of events processed since startup.
    total_events_processed: Arc<AtomicU64>,
    /// Total number of documents indexed since startup.
    total_documents_indexed: Arc<AtomicU64>,
}

impl Orchestrator {
    /// Create a new orchestrator with the given components.
    pub fn new(
        consumer: Arc<dyn Consumer>,
        processor: ResourceEventProcessor,
        loader: SearchLoader,
    ) -> Self {
        Self::with_config(consumer, processor, loader, OrchestratorConfig::default())
    }

    /// Create a new orchestrator with custom configuration.
    pub fn with_config(
        consumer: Arc<dyn Consumer>,
        processor: ResourceEventProcessor,
        loader: SearchLoader,
        config: OrchestratorConfig,
    ) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        Self {
            consumer,
            processor,
            loader,
            config,
            language_refresh: None,
            shutdown_tx,
            total_events_processed: Arc::new(AtomicU64::new(0)),
            total_documents_indexed: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Reload the supported languages from `provider` every `interval`.
    ///
    /// Conversions already running keep the languages they started with.
    pub fn with_language_refresh(
        mut self,
        snapshots: Arc<SnapshotStore>,
        provider: Arc<dyn LanguageConfigProvider>,
        interval: Duration,
    ) -> Self {
        self.language_refresh = Some(LanguageRefresh {
            snapshots,
            provider,
            interval,
        });
        self
    }

    /// Total number of events processed since startup.
    pub fn total_events_processed(&self) -> u64 {
        self.total_events_processed.load(Ordering::Relaxed)
    }

    /// Total number of documents indexed since startup.
    pub fn total_documents_indexed(&self) -> u64 {
        self.total_documents_indexed.load(Ordering::Relaxed)
    }

    /// Run the orchestrator.
    ///
    /// This method starts all ingest components and coordinates message flow.
    /// It returns once the consumer stream ends or a shutdown signal is received.
    #[instrument(skip(self))]
    pub async fn run(&mut self) -> Result<(), IngestError> {
        info!("Starting catalog indexer orchestrator");

        self.consumer.subscribe()?;

        let (event_transmitter, mut event_receiver) =
            mpsc::channel::<StreamMessage>(self.config.channel_buffer_size);
        let (ack_transmitter, ack_receiver) =
            mpsc::channel::<StreamMessage>(self.config.channel_buffer_size);

        let consumer = self.consumer.clone();
        let shutdown_rx = self.shutdown_tx.subscribe();

        let consumer_handle = tokio::spawn(async move {
            if let Err(e) = consumer
                .run(event_transmitter, ack_receiver, shutdown_rx)
                .await
            {
                error!(error = %e, "Consumer error");
            }
        });

        info!("Ready to process resource events");

        let total_events = Arc::clone(&self.total_events_processed);
        let total_docs = Arc::clone(&self.total_documents_indexed);
        let mut progress_timer = interval(self.config.progress_interval);
        progress_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut language_timer = self.language_refresh.as_ref().map(|refresh| {
            let mut timer = interval(refresh.interval);
            timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
            timer
        });
        // The first tick completes immediately and the languages are fresh
        if let Some(timer) = language_timer.as_mut() {
            timer.tick().await;
        }

        // Offsets of NACKed batches whose documents are still buffered
        let mut unacknowledged: Vec<u64> = Vec::new();

        let mut prev_events: u64 = 0;
        let mut prev_docs: u64 = 0;
        let mut prev_time = std::time::Instant::now();

        loop {
            tokio::select! {
                msg = event_receiver.recv() => {
                    match msg {
                        Some(StreamMessage::Events { events, offsets }) => {
                            info!(
                                event_count = events.len(),
                                offset_count = offsets.len(),
                                "Received events from consumer"
                            );
                            match self.process_events(events).await {
                                Ok(()) => {
                                    // The flush also wrote what earlier failures left buffered
                                    let mut offsets = offsets;
                                    offsets.append(&mut unacknowledged);
                                    let _ = ack_transmitter.send(StreamMessage::Acknowledgment {
                                        offsets,
                                        success: true,
                                        error: None,
                                    }).await;
                                }
                                Err(e) => {
                                    error!(error = %e, "Failed to process events. Sending NACK to consumer");
                                    unacknowledged.extend_from_slice(&offsets);
                                    let _ = ack_transmitter.send(StreamMessage::Acknowledgment {
                                        offsets,
                                        success: false,
                                        error: Some(e.to_string()),
                                    }).await;
                                }
                            }
                        }
                        Some(StreamMessage::Error(e)) => {
                            error!(error = %e, "Received error from consumer");
                        }
                        Some(StreamMessage::End) | None => {
                            info!("Consumer stream ended");
                            break;
                        }
                        Some(StreamMessage::Acknowledgment { .. }) => {
                            warn!("Received acknowledgment on event channel (should be on ack channel)");
                        }
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Received shutdown signal");
                    let _ = self.shutdown_tx.send(());
                    break;
                }
                _ = tick_optional(&mut language_timer) => {
                    self.refresh_languages().await;
                }
                _ = progress_timer.tick() => {
                    let events = total_events.load(Ordering::Relaxed);
                    let docs = total_docs.load(Ordering::Relaxed);

                    let now = std::time::Instant::now();
                    let elapsed_secs = now.duration_since(prev_time).as_secs_f64();

                    let events_per_sec = if elapsed_secs > 0.0 {
                        (events.saturating_sub(prev_events) as f64) / elapsed_secs
                    } else {
                        0.0
                    };

                    let docs_per_sec = if elapsed_secs > 0.0 {
                        (docs.saturating_sub(prev_docs) as f64) / elapsed_secs
                    } else {
                        0.0
                    };

                    info!(
                        events_processed = events,
                        documents_indexed = docs,
                        events_per_sec = format!("{:.2}", events_per_sec),
                        documents_per_sec = format!("{:.2}", docs_per_sec),
                        "Processing progress"
                    );

                    prev_events = events;
                    prev_docs = docs;
                    prev_time = now;
                }
            }
        }

        if !unacknowledged.is_empty() {
            self.retry_unacknowledged(unacknowledged, &ack_transmitter).await;
        }

        drop(ack_transmitter);
        let _ = consumer_handle.await;

        info!(
            total_events_processed = self.total_events_processed(),
            total_documents_indexed = self.total_documents_indexed(),
            "Orchestrator shutdown complete"
        );
        Ok(())
    }

    /// Process a batch of events through the ingest.
    ///
    /// Documents are written before this returns Ok, so the batch can be
    /// acknowledged afterwards.
    async fn process_events(&mut self, events: Vec<ResourceEvent>) -> Result<(), IngestError> {
        let event_count = events.len();
        self.total_events_processed
            .fetch_add(event_count as u64, Ordering::Relaxed);

        debug!(event_count = event_count, "Processing batch of events");

        let processed = self.processor.process_batch(&events).await;

        if processed.is_empty() {
            debug!("No documents to index after processing");
        }

        let result = self.loader.load(processed).await;
        let result = match result {
            Ok(()) => self.loader.flush().await,
            Err(e) => Err(e),
        };

        self.total_documents_indexed
            .store(self.loader.indexed_documents(), Ordering::Relaxed);
        result
    }

    /// Last attempt to write the documents of NACKed batches before exiting.
    async fn retry_unacknowledged(
        &mut self,
        offsets: Vec<u64>,
        ack_transmitter: &mpsc::Sender<StreamMessage>,
    ) {
        match self.loader.flush().await {
            Ok(()) => {
                info!(
                    offset_count = offsets.len(),
                    "Wrote documents of previously failed batches"
                );
                self.total_documents_indexed
                    .store(self.loader.indexed_documents(), Ordering::Relaxed);
                let _ = ack_transmitter
                    .send(StreamMessage::Acknowledgment {
                        offsets,
                        success: true,
                        error: None,
                    })
                    .await;
            }
            Err(e) => {
                error!(
                    error = %e,
                    offset_count = offsets.len(),
                    pending_documents = self.loader.pending(),
                    "Exiting with unwritten documents"
                );
            }
        }
    }

    async fn refresh_languages(&self) {
        let Some(refresh) = self.language_refresh.as_ref() else {
            return;
        };
        if let Err(e) = refresh
            .snapshots
            .refresh_languages(refresh.provider.as_ref())
            .await
        {
            warn!(error = %e, "Failed to refresh supported languages, keeping current ones");
        }
    }

    /// Trigger a graceful shutdown.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }
}

async fn tick_optional(timer: &mut Option<Interval>) {
    match timer {
        Some(timer) => {
            timer.tick().await;
        }
        None => std::future::pending().await,
    }
}

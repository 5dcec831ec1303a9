//! Resource events read from a JSON lines file.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use catalog_indexer_shared::ResourceEvent;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, error, info, instrument, warn};

use crate::consumer::{Consumer, StreamMessage};
use crate::errors::IngestError;

/// Consumer reading one `ResourceEvent` per line of a file.
///
/// Offsets are 1-based line numbers. Blank lines are ignored and lines that
/// do not parse are reported and skipped.
///
/// A NACKed line stays outstanding until a later acknowledgment covers it,
/// and the committed offset never moves past an outstanding line.
pub struct JsonLinesConsumer {
    path: PathBuf,
    batch_size: usize,
    acknowledged_offset: AtomicU64,
    outstanding_offsets: Mutex<BTreeSet<u64>>,
}

impl JsonLinesConsumer {
    /// Create a new consumer for `path` with the default batch size of 50.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self::with_batch_size(path, 50)
    }

    /// Create a new consumer sending at most `batch_size` events per batch.
    pub fn with_batch_size(path: impl AsRef<Path>, batch_size: usize) -> Self {
        let batch_size = batch_size.max(1);
        info!(
            path = %path.as_ref().display(),
            batch_size = batch_size,
            "Created JSON lines consumer"
        );
        Self {
            path: path.as_ref().to_path_buf(),
            batch_size,
            acknowledged_offset: AtomicU64::new(0),
            outstanding_offsets: Mutex::new(BTreeSet::new()),
        }
    }

    /// Highest line up to which every event is known to be written.
    pub fn committed_offset(&self) -> u64 {
        let acknowledged = self.acknowledged_offset.load(Ordering::SeqCst);
        let outstanding = self
            .outstanding_offsets
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        match outstanding.first() {
            Some(&first) => acknowledged.min(first.saturating_sub(1)),
            None => acknowledged,
        }
    }

    /// Lines whose events were NACKed and not written since.
    pub fn outstanding_offsets(&self) -> Vec<u64> {
        self.outstanding_offsets
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .copied()
            .collect()
    }

    fn parse_line(line: &str, line_number: u64) -> Result<Option<ResourceEvent>, IngestError> {
        if line.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str(line)
            .map(Some)
            .map_err(|e| IngestError::parse(format!("line {}: {}", line_number, e)))
    }

    async fn flush_batch(
        &self,
        batch: &mut Vec<ResourceEvent>,
        offsets: &mut Vec<u64>,
        sender: &mpsc::Sender<StreamMessage>,
    ) -> Result<(), IngestError> {
        if batch.is_empty() {
            return Ok(());
        }
        debug!(count = batch.len(), "Sending batch of events");
        sender
            .send(StreamMessage::Events {
                events: std::mem::take(batch),
                offsets: std::mem::take(offsets),
            })
            .await
            .map_err(|e| IngestError::ChannelError(e.to_string()))
    }

    fn handle_acknowledgment(&self, offsets: &[u64], success: bool, error: Option<&str>) {
        let mut outstanding = self
            .outstanding_offsets
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if success {
            for offset in offsets {
                outstanding.remove(offset);
            }
            drop(outstanding);
            if let Some(&last) = offsets.iter().max() {
                self.acknowledged_offset.fetch_max(last, Ordering::SeqCst);
            }
            debug!(
                offset_count = offsets.len(),
                committed_offset = self.committed_offset(),
                "Committed offsets after successful processing"
            );
        } else {
            outstanding.extend(offsets.iter().copied());
            error!(
                offset_count = offsets.len(),
                outstanding = outstanding.len(),
                error = error.unwrap_or("Unknown error"),
                "Not committing offsets due to processing failure"
            );
        }
    }
}

#[async_trait]
impl Consumer for JsonLinesConsumer {
    fn subscribe(&self) -> Result<(), IngestError> {
        if !self.path.is_file() {
            return Err(IngestError::consumer(format!(
                "Events file not found: {}",
                self.path.display()
            )));
        }
        info!(path = %self.path.display(), "Subscribed to events file");
        Ok(())
    }

    #[instrument(skip(self, sender, ack_receiver, shutdown), fields(path = %self.path.display()))]
    async fn run(
        &self,
        sender: mpsc::Sender<StreamMessage>,
        mut ack_receiver: mpsc::Receiver<StreamMessage>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), IngestError> {
        let file = File::open(&self.path).await?;
        let mut lines = BufReader::new(file).lines();
        let mut batch: Vec<ResourceEvent> = Vec::with_capacity(self.batch_size);
        let mut pending_offsets: Vec<u64> = Vec::with_capacity(self.batch_size);
        let mut line_number: u64 = 0;

        loop {
            tokio::select! {
                _ = shutdown.recv() => {
                    info!("Consumer received shutdown signal");
                    let _ = sender.send(StreamMessage::End).await;
                    break;
                }
                ack_msg = ack_receiver.recv() => {
                    match ack_msg {
                        Some(StreamMessage::Acknowledgment { offsets, success, error }) => {
                            self.handle_acknowledgment(&offsets, success, error.as_deref());
                        }
                        Some(StreamMessage::End) | None => {
                            info!("Acknowledgment channel closed");
                            break;
                        }
                        _ => {}
                    }
                }
                line = lines.next_line() => {
                    match line {
                        Ok(Some(line)) => {
                            line_number += 1;
                            match Self::parse_line(&line, line_number) {
                                Ok(Some(event)) => {
                                    batch.push(event);
                                    pending_offsets.push(line_number);
                                    if batch.len() >= self.batch_size {
                                        self.flush_batch(&mut batch, &mut pending_offsets, &sender).await?;
                                    }
                                }
                                Ok(None) => {}
                                Err(e) => {
                                    warn!(line = line_number, error = %e, "Skipping unparsable event");
                                    let _ = sender.send(StreamMessage::Error(e.to_string())).await;
                                }
                            }
                        }
                        Ok(None) => {
                            info!(lines = line_number, "Reached end of events file");
                            self.flush_batch(&mut batch, &mut pending_offsets, &sender).await?;
                            let _ = sender.send(StreamMessage::End).await;
                            break;
                        }
                        Err(e) => {
                            error!(error = %e, "Failed to read events file");
                            let _ = sender.send(StreamMessage::Error(e.to_string())).await;
                            return Err(e.into());
                        }
                    }
                }
            }
        }

        // Acknowledgments of the last batches arrive after End
        while let Some(message) = ack_receiver.recv().await {
            if let StreamMessage::Acknowledgment { offsets, success, error } = message {
                self.handle_acknowledgment(&offsets, success, error.as_deref());
            }
        }

        Ok(())
    }
}

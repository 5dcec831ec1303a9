//! Consumer module for the catalog indexer ingest.
//!
//! Provides the event sources resource events are read from.

mod json_lines_consumer;
mod messages;

use async_trait::async_trait;
use tokio::sync::{broadcast, mpsc};

use crate::errors::IngestError;

pub use json_lines_consumer::JsonLinesConsumer;
pub use messages::StreamMessage;

/// Source of resource event batches.
#[async_trait]
pub trait Consumer: Send + Sync {
    /// Prepare the source; called once before `run`.
    fn subscribe(&self) -> Result<(), IngestError>;

    /// Read events and send them through the channel in batches.
    ///
    /// # Arguments
    ///
    /// * `sender` - Channel to send messages to
    /// * `ack_receiver` - Channel to receive acknowledgments from orchestrator
    /// * `shutdown` - Shutdown signal receiver
    async fn run(
        &self,
        sender: mpsc::Sender<StreamMessage>,
        ack_receiver: mpsc::Receiver<StreamMessage>,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), IngestError>;
}

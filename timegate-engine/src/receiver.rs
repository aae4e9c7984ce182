//! Change receivers — bounded fan-out workers.
//!
//! A receiver sits between the poller and one downstream effect. Its
//! bounded queue is the backpressure path: when the queue is full, `push`
//! suspends the poller until the consumer frees a slot, throttling the
//! drain rate without dropping records.

use crate::applier::ChangeApplier;
use crate::error::{ApplyError, DeliveryError};
use async_trait::async_trait;
use std::sync::Arc;
use timegate_store::ChangeStore;
use timegate_types::ChangeRecord;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::warn;

/// The downstream effect a receiver drives.
#[async_trait]
pub trait ChangeHandler: Send + Sync {
    /// Handles one delivered record.
    async fn on_change(&self, record: ChangeRecord) -> Result<(), ApplyError>;
}

/// A bounded single-consumer queue in front of a [`ChangeHandler`].
///
/// The consumer loop takes one record at a time and invokes the handler.
/// Handler failures are logged and swallowed: from the pipeline's point of
/// view the record was delivered once `push` accepted it, and a failing
/// effect must not dam up the records behind it. Retry-forever lives at
/// the poller's delivery boundary (`push`), never here. The history store
/// keeps the record, so an operator can re-enqueue it from there.
pub struct ChangeReceiver {
    sender: Mutex<Option<mpsc::Sender<ChangeRecord>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl ChangeReceiver {
    /// Spawns the consumer loop over a queue of the given capacity.
    #[must_use]
    pub fn spawn(handler: Arc<dyn ChangeHandler>, capacity: usize) -> Self {
        let (sender, mut queue) = mpsc::channel::<ChangeRecord>(capacity);
        let worker = tokio::spawn(async move {
            while let Some(record) = queue.recv().await {
                let change_id = record.change_id;
                if let Err(err) = handler.on_change(record).await {
                    warn!(%change_id, "change handler failed: {err}");
                }
            }
        });

        Self {
            sender: Mutex::new(Some(sender)),
            worker: Mutex::new(Some(worker)),
        }
    }

    /// Enqueues a record, suspending while the queue is full.
    ///
    /// Fails only when the receiver has shut down.
    pub async fn push(&self, record: ChangeRecord) -> Result<(), DeliveryError> {
        let guard = self.sender.lock().await;
        match guard.as_ref() {
            Some(sender) => sender
                .send(record)
                .await
                .map_err(|_| DeliveryError::Closed),
            None => Err(DeliveryError::Closed),
        }
    }

    /// Closes the queue for new pushes and waits for the consumer to drain
    /// what was already accepted.
    pub async fn shutdown(&self) {
        self.sender.lock().await.take();
        if let Some(worker) = self.worker.lock().await.take() {
            let _ = worker.await;
        }
    }
}

/// Applies delivered records to a [`ChangeApplier`] (the materialized
/// view).
pub struct RepositoryHandler {
    applier: Arc<dyn ChangeApplier>,
}

impl RepositoryHandler {
    #[must_use]
    pub fn new(applier: Arc<dyn ChangeApplier>) -> Self {
        Self { applier }
    }
}

#[async_trait]
impl ChangeHandler for RepositoryHandler {
    async fn on_change(&self, record: ChangeRecord) -> Result<(), ApplyError> {
        self.applier.apply(&record).await
    }
}

/// Appends delivered records to a historical [`ChangeStore`].
pub struct HistoryHandler {
    store: Arc<dyn ChangeStore>,
}

impl HistoryHandler {
    #[must_use]
    pub fn new(store: Arc<dyn ChangeStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ChangeHandler for HistoryHandler {
    async fn on_change(&self, record: ChangeRecord) -> Result<(), ApplyError> {
        self.store.enqueue(std::slice::from_ref(&record)).await?;
        Ok(())
    }
}

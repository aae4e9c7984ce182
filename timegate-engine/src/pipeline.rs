//! Pipeline facade — the standard deployment wiring.

use crate::applier::ChangeApplier;
use crate::poller::{ChangePoller, PollerConfig};
use crate::receiver::{ChangeReceiver, HistoryHandler, RepositoryHandler};
use std::sync::Arc;
use timegate_store::ChangeStore;
use timegate_types::Clock;

/// The common deployment: a pending store drained into a materialized view
/// and, optionally, a historical log.
///
/// Spawns one receiver per downstream plus the poller, and shuts them down
/// in order: poller first (no new deliveries), then receivers (drain what
/// was already queued).
pub struct TemporalPipeline {
    poller: ChangePoller,
    receivers: Vec<Arc<ChangeReceiver>>,
}

impl TemporalPipeline {
    /// Starts the pipeline.
    #[must_use]
    pub fn start(
        pending: Arc<dyn ChangeStore>,
        applier: Arc<dyn ChangeApplier>,
        history: Option<Arc<dyn ChangeStore>>,
        clock: Arc<dyn Clock>,
        config: PollerConfig,
    ) -> Self {
        let mut receivers = vec![Arc::new(ChangeReceiver::spawn(
            Arc::new(RepositoryHandler::new(applier)),
            config.queue_capacity,
        ))];
        if let Some(history) = history {
            receivers.push(Arc::new(ChangeReceiver::spawn(
                Arc::new(HistoryHandler::new(history)),
                config.queue_capacity,
            )));
        }

        let poller = ChangePoller::spawn(pending, receivers.clone(), clock, config);
        Self { poller, receivers }
    }

    /// Stops the poller, then drains and stops every receiver.
    pub async fn shutdown(&self) {
        self.poller.shutdown().await;
        for receiver in &self.receivers {
            receiver.shutdown().await;
        }
    }
}

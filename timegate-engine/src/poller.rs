//! Change poller — the temporal scheduler.
//!
//! Loops between two states until shut down: drain every record whose
//! effective time has arrived, then idle for the polling interval. A due
//! record is pushed to every receiver and then deleted from the store;
//! both steps retry forever with a fixed backoff, so a record is never
//! skipped — an undeliverable record holds the loop (availability over
//! liveness) until the downstream recovers or the poller is shut down.

use crate::receiver::ChangeReceiver;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use timegate_store::ChangeStore;
use timegate_types::Clock;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Configuration for the poller and its receivers.
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// How long to idle after the due set is exhausted.
    pub poll_interval: Duration,
    /// Fixed delay between delivery/delete retries.
    pub retry_backoff: Duration,
    /// Bounded capacity of each receiver queue.
    pub queue_capacity: usize,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(10),
            retry_backoff: Duration::from_secs(1),
            queue_capacity: 3,
        }
    }
}

/// Drains due change records from a store and fans them out to receivers.
pub struct ChangePoller {
    shutdown: watch::Sender<bool>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl ChangePoller {
    /// Starts the drain loop on a dedicated task.
    #[must_use]
    pub fn spawn(
        store: Arc<dyn ChangeStore>,
        receivers: Vec<Arc<ChangeReceiver>>,
        clock: Arc<dyn Clock>,
        config: PollerConfig,
    ) -> Self {
        let (shutdown, signal) = watch::channel(false);
        let worker = tokio::spawn(run_loop(store, receivers, clock, config, signal));
        Self {
            shutdown,
            worker: Mutex::new(Some(worker)),
        }
    }

    /// Signals the loop to stop and waits for it to exit.
    ///
    /// In-flight backoff and interval waits abort immediately; a delivery
    /// already handed to a receiver queue is never yanked back.
    pub async fn shutdown(&self) {
        let _ = self.shutdown.send(true);
        if let Some(worker) = self.worker.lock().await.take() {
            let _ = worker.await;
        }
    }
}

async fn run_loop(
    store: Arc<dyn ChangeStore>,
    receivers: Vec<Arc<ChangeReceiver>>,
    clock: Arc<dyn Clock>,
    config: PollerConfig,
    mut signal: watch::Receiver<bool>,
) {
    info!(
        poll_interval_ms = config.poll_interval.as_millis() as u64,
        receivers = receivers.len(),
        "change poller started"
    );

    while !*signal.borrow() {
        let due = match store.query_due(clock.now()).await {
            Ok(due) => due,
            Err(err) => {
                warn!("pending-change query failed: {err}");
                Vec::new()
            }
        };

        for record in due {
            for receiver in &receivers {
                let delivered = retry_forever(
                    || receiver.push(record.clone()),
                    config.retry_backoff,
                    &mut signal,
                )
                .await;
                if !delivered {
                    info!("change poller stopped mid-delivery");
                    return;
                }
            }

            let deleted = retry_forever(
                || store.delete(record.change_id),
                config.retry_backoff,
                &mut signal,
            )
            .await;
            if !deleted {
                info!("change poller stopped mid-delete");
                return;
            }
        }

        tokio::select! {
            _ = tokio::time::sleep(config.poll_interval) => {}
            changed = signal.changed() => {
                // A closed signal channel means the poller handle is gone.
                if changed.is_err() {
                    break;
                }
            }
        }
    }

    info!("change poller stopped");
}

/// Runs `op` until it succeeds, sleeping `backoff` between attempts.
///
/// Returns `false` — not completed, not an error — when the shutdown
/// signal fires, aborting both an in-flight attempt and a backoff wait.
/// There is no retry cap: a change is never dropped.
async fn retry_forever<F, Fut, E>(
    mut op: F,
    backoff: Duration,
    signal: &mut watch::Receiver<bool>,
) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(), E>>,
    E: std::fmt::Display,
{
    loop {
        if *signal.borrow() {
            return false;
        }

        let attempt = tokio::select! {
            result = op() => Some(result),
            changed = signal.changed() => {
                if changed.is_err() || *signal.borrow() {
                    return false;
                }
                None
            }
        };

        match attempt {
            None => {}
            Some(Ok(())) => return true,
            Some(Err(err)) => {
                debug!("retrying after failure: {err}");
                tokio::select! {
                    _ = tokio::time::sleep(backoff) => {}
                    changed = signal.changed() => {
                        if changed.is_err() || *signal.borrow() {
                            return false;
                        }
                    }
                }
            }
        }
    }
}

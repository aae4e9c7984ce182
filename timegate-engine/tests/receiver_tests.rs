use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use timegate_engine::{ApplyError, ChangeHandler, ChangeReceiver, DeliveryError};
use timegate_model::PathError;
use timegate_types::{ChangeId, ChangeIdSource, ChangeRecord, Timestamp};
use tokio::sync::{Mutex, Semaphore};
use tokio::time::timeout;

fn make_record(ids: &ChangeIdSource) -> ChangeRecord {
    ChangeRecord::partial(ids, "employee", Timestamp::MIN, "1", HashMap::new())
        .set("name", &"x")
        .unwrap()
        .build()
}

/// Records everything it sees, in order.
struct CollectingHandler {
    seen: Mutex<Vec<ChangeId>>,
}

impl CollectingHandler {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            seen: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl ChangeHandler for CollectingHandler {
    async fn on_change(&self, record: ChangeRecord) -> Result<(), ApplyError> {
        self.seen.lock().await.push(record.change_id);
        Ok(())
    }
}

/// Blocks on a semaphore permit per record, counting completions.
struct GatedHandler {
    gate: Semaphore,
    handled: AtomicUsize,
}

#[async_trait]
impl ChangeHandler for GatedHandler {
    async fn on_change(&self, _record: ChangeRecord) -> Result<(), ApplyError> {
        let permit = self.gate.acquire().await.expect("gate closed");
        permit.forget();
        self.handled.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Always fails, counting attempts.
struct FailingHandler {
    attempts: AtomicUsize,
}

#[async_trait]
impl ChangeHandler for FailingHandler {
    async fn on_change(&self, _record: ChangeRecord) -> Result<(), ApplyError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        // Any model error will do; the registry is empty.
        Err(ApplyError::from(PathError::InvalidPath {
            path: String::new(),
        }))
    }
}

#[tokio::test]
async fn records_are_consumed_in_push_order() {
    let handler = CollectingHandler::new();
    let receiver = ChangeReceiver::spawn(handler.clone(), 3);
    let ids = ChangeIdSource::starting_at(1);

    let records: Vec<_> = (0..5).map(|_| make_record(&ids)).collect();
    let expected: Vec<_> = records.iter().map(|r| r.change_id).collect();
    for record in records {
        receiver.push(record).await.unwrap();
    }

    receiver.shutdown().await;
    assert_eq!(*handler.seen.lock().await, expected);
}

#[tokio::test]
async fn full_queue_suspends_push_without_losing_records() {
    let handler = Arc::new(GatedHandler {
        gate: Semaphore::new(0),
        handled: AtomicUsize::new(0),
    });
    let receiver = Arc::new(ChangeReceiver::spawn(handler.clone(), 2));
    let ids = ChangeIdSource::starting_at(1);

    // Capacity 2 plus the one the consumer has taken off the queue:
    // three pushes land, the fourth must suspend.
    for _ in 0..3 {
        timeout(Duration::from_secs(1), receiver.push(make_record(&ids)))
            .await
            .expect("push should not block yet")
            .unwrap();
    }

    let blocked = {
        let receiver = receiver.clone();
        let record = make_record(&ids);
        tokio::spawn(async move { receiver.push(record).await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!blocked.is_finished(), "push into a full queue must suspend");

    // Let one record through; the blocked push gets the freed slot.
    handler.gate.add_permits(1);
    timeout(Duration::from_secs(1), blocked)
        .await
        .expect("push should resume once a slot frees")
        .unwrap()
        .unwrap();

    // Release the rest and drain: all four pushed records are handled.
    handler.gate.add_permits(3);
    receiver.shutdown().await;
    assert_eq!(handler.handled.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn handler_failures_are_swallowed_and_do_not_block_the_queue() {
    let handler = Arc::new(FailingHandler {
        attempts: AtomicUsize::new(0),
    });
    let receiver = ChangeReceiver::spawn(handler.clone(), 3);
    let ids = ChangeIdSource::starting_at(1);

    for _ in 0..4 {
        receiver.push(make_record(&ids)).await.unwrap();
    }

    receiver.shutdown().await;
    // Every record reached the handler despite every attempt failing.
    assert_eq!(handler.attempts.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn shutdown_drains_accepted_records_then_rejects_pushes() {
    let handler = CollectingHandler::new();
    let receiver = ChangeReceiver::spawn(handler.clone(), 3);
    let ids = ChangeIdSource::starting_at(1);

    for _ in 0..3 {
        receiver.push(make_record(&ids)).await.unwrap();
    }
    receiver.shutdown().await;
    assert_eq!(handler.seen.lock().await.len(), 3);

    let err = receiver.push(make_record(&ids)).await.unwrap_err();
    assert!(matches!(err, DeliveryError::Closed));
}

use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;
use timegate_types::{ChangeId, ChangeIdSource};

// ── Basics ───────────────────────────────────────────────────────

#[test]
fn ids_are_strictly_increasing() {
    let ids = ChangeIdSource::starting_at(100);
    let a = ids.next_id();
    let b = ids.next_id();
    let c = ids.next_id();
    assert!(a < b);
    assert!(b < c);
    assert_eq!(a.as_i64(), 100);
    assert_eq!(c.as_i64(), 102);
}

#[test]
fn fresh_source_starts_above_past_runs() {
    // A source seeded now must allocate above an id drawn a while ago.
    let old = ChangeId::from_raw(1_600_000_000_000i64 << 20);
    let ids = ChangeIdSource::new();
    assert!(ids.next_id() > old);
}

#[test]
fn min_sorts_before_everything() {
    let ids = ChangeIdSource::new();
    assert!(ChangeId::MIN < ids.next_id());
}

#[test]
fn display_and_parse_round_trip() {
    let id = ChangeId::from_raw(42);
    let parsed: ChangeId = id.to_string().parse().unwrap();
    assert_eq!(parsed, id);
}

// ── Concurrency ──────────────────────────────────────────────────

#[test]
fn concurrent_allocation_never_duplicates() {
    let ids = Arc::new(ChangeIdSource::starting_at(0));
    let mut handles = Vec::new();
    for _ in 0..8 {
        let ids = ids.clone();
        handles.push(std::thread::spawn(move || {
            (0..1000).map(|_| ids.next_id()).collect::<Vec<_>>()
        }));
    }

    let mut seen = HashSet::new();
    for handle in handles {
        for id in handle.join().unwrap() {
            assert!(seen.insert(id), "duplicate id {id}");
        }
    }
    assert_eq!(seen.len(), 8000);
}

// ── Properties ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn sequential_draws_are_monotonic(seed in 0i64..1_000_000, draws in 1usize..200) {
        let ids = ChangeIdSource::starting_at(seed);
        let mut prev = ids.next_id();
        for _ in 0..draws {
            let next = ids.next_id();
            prop_assert!(next > prev);
            prev = next;
        }
    }

    #[test]
    fn serde_round_trip(raw in any::<i64>()) {
        let id = ChangeId::from_raw(raw);
        let json = serde_json::to_string(&id).unwrap();
        let back: ChangeId = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back, id);
    }
}

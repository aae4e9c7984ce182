use std::time::Duration;
use timegate_types::{Clock, ManualClock, SystemClock, Timestamp};

// ── Construction & ordering ──────────────────────────────────────

#[test]
fn now_is_positive() {
    assert!(Timestamp::now().as_millis() > 0);
}

#[test]
fn from_millis_round_trips() {
    let ts = Timestamp::from_millis(12345);
    assert_eq!(ts.as_millis(), 12345);
}

#[test]
fn ordering_follows_millis() {
    let a = Timestamp::from_millis(100);
    let b = Timestamp::from_millis(200);
    assert!(a < b);
    assert!(Timestamp::MIN < a);
    assert!(b < Timestamp::MAX);
}

#[test]
fn add_duration() {
    let ts = Timestamp::from_millis(1000) + Duration::from_millis(250);
    assert_eq!(ts.as_millis(), 1250);
}

#[test]
fn add_saturates_at_max() {
    let ts = Timestamp::MAX + Duration::from_secs(1);
    assert_eq!(ts, Timestamp::MAX);
}

// ── Clocks ───────────────────────────────────────────────────────

#[test]
fn system_clock_tracks_wall_time() {
    let before = Timestamp::now();
    let read = SystemClock.now();
    let after = Timestamp::now();
    assert!(before <= read && read <= after);
}

#[test]
fn manual_clock_only_moves_when_told() {
    let clock = ManualClock::starting_at(Timestamp::from_millis(500));
    assert_eq!(clock.now(), Timestamp::from_millis(500));
    assert_eq!(clock.now(), Timestamp::from_millis(500));

    clock.advance(Duration::from_millis(300));
    assert_eq!(clock.now(), Timestamp::from_millis(800));

    clock.set(Timestamp::from_millis(100));
    assert_eq!(clock.now(), Timestamp::from_millis(100));
}

#[test]
fn serde_is_transparent() {
    let ts = Timestamp::from_millis(77);
    assert_eq!(serde_json::to_string(&ts).unwrap(), "77");
    let back: Timestamp = serde_json::from_str("77").unwrap();
    assert_eq!(back, ts);
}

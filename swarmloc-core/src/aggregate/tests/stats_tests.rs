use crate::aggregate::NodeStatsTracker;
use crate::ingest::NodeId;
use chrono::Utc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[test]
fn counters_are_created_lazily_and_only_increase() {
    let stats = NodeStatsTracker::new();
    assert!(stats.get(NodeId(1)).is_none());

    stats.record_range(NodeId(1));
    stats.record_range(NodeId(1));
    stats.record_error(NodeId(1));
    stats.record_discovery(NodeId(2));
    stats.record_disconnect(NodeId(2));

    let one = stats.get(NodeId(1)).unwrap();
    assert_eq!(one.range_count, 2);
    assert_eq!(one.error_count, 1);
    assert!(one.last_seen.is_some());

    let two = stats.get(NodeId(2)).unwrap();
    assert_eq!(two.discovery_count, 1);
    assert_eq!(two.disconnect_count, 1);
    assert_eq!(two.range_count, 0);
}

#[test]
fn touch_registers_node_without_counting() {
    let stats = NodeStatsTracker::new();
    stats.touch(NodeId(9));

    let nine = stats.get(NodeId(9)).unwrap();
    assert_eq!(nine.range_count, 0);
    assert!(nine.last_seen.is_some());
    assert_eq!(stats.node_count(), 1);
}

#[test]
fn error_rate_requires_ranges() {
    let stats = NodeStatsTracker::new();
    stats.record_error(NodeId(1));
    assert_eq!(stats.get(NodeId(1)).unwrap().error_rate(), None);

    for _ in 0..4 {
        stats.record_range(NodeId(1));
    }
    assert_eq!(stats.get(NodeId(1)).unwrap().error_rate(), Some(0.25));
}

#[test]
fn activity_follows_last_seen() {
    let stats = NodeStatsTracker::new();
    stats.touch(NodeId(1));
    let node = stats.get(NodeId(1)).unwrap();

    let window = Duration::from_secs(5);
    assert!(node.is_active(Utc::now(), window));
    assert!(!node.is_active(Utc::now() + chrono::Duration::seconds(10), window));
}

#[test]
fn concurrent_increments_are_not_lost() {
    let stats = Arc::new(NodeStatsTracker::new());
    let threads = 8;
    let per_thread = 1_000;

    let handles: Vec<_> = (0..threads)
        .map(|i| {
            let stats = stats.clone();
            thread::spawn(move || {
                for _ in 0..per_thread {
                    stats.record_range(NodeId(i % 3));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let total: u64 = stats.snapshot().values().map(|s| s.range_count).sum();
    assert_eq!(total, threads as u64 * per_thread);
}

use integration_tests::harness::{captured_events, init_test_tracing, scripted, test_config};
use pretty_assertions::assert_eq;
use std::fs;
use std::sync::Arc;
use swarmloc_core::ingest::{IdentitySource, NodeId};
use swarmloc_core::monitor::{MonitorSession, SessionOptions, strip_timestamp_prefix};
use swarmloc_core::render::PlainHighlighter;
use tracing::Level;

fn options(dir: &std::path::Path) -> SessionOptions {
    SessionOptions {
        config: test_config(dir),
        show_matrix: false,
        highlighter: Arc::new(PlainHighlighter),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn handshake_lines_are_replayed_into_the_log() {
    let dir = tempfile::tempdir().unwrap();
    let mut session =
        MonitorSession::start_with_writers(options(dir.path()), tokio::io::sink(), tokio::io::sink());

    session.spawn_device(
        "boot-banner",
        scripted(&["DW3000 firmware v1.4", "[DISCOVER] peer 5", "7,3,5,0.84,-66"]),
        None,
    );
    session.run_until_stopped().await;
    let outcome = session.finish().await;

    let device = &outcome.devices[0];
    assert_eq!(device.node, NodeId(3));
    assert_eq!(device.identity, IdentitySource::Measurement);
    assert_eq!(device.lines, 3);

    let logged: Vec<String> = fs::read_to_string(&device.log_path)
        .unwrap()
        .lines()
        .map(|l| strip_timestamp_prefix(l).to_string())
        .collect();
    assert_eq!(
        logged,
        vec!["DW3000 firmware v1.4", "[DISCOVER] peer 5", "7,3,5,0.84,-66"]
    );

    let stats = &outcome.snapshot.nodes[&NodeId(3)];
    assert_eq!(stats.discovery_count, 1);
    assert_eq!(stats.range_count, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn silent_device_falls_back_to_sentinel_with_a_warning() {
    init_test_tracing();
    let dir = tempfile::tempdir().unwrap();
    let mut session =
        MonitorSession::start_with_writers(options(dir.path()), tokio::io::sink(), tokio::io::sink());

    session.spawn_device("mute-device", scripted(&["booting...", "ERROR radio init"]), None);
    session.run_until_stopped().await;
    let outcome = session.finish().await;

    let device = &outcome.devices[0];
    assert_eq!(device.node, NodeId(0));
    assert_eq!(device.identity, IdentitySource::Sentinel);
    assert_eq!(outcome.snapshot.nodes[&NodeId(0)].error_count, 1);

    let events = captured_events();
    let events = events.lock().unwrap();
    let warning = events
        .iter()
        .find(|e| e.field("device") == Some("mute-device") && e.level == Level::WARN)
        .expect("sentinel warning");
    assert_eq!(warning.message(), Some("could not detect node id, using sentinel"));
}

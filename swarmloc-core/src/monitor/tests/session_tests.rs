use crate::conf::MonitorConfig;
use crate::ingest::NodeId;
use crate::monitor::tests::test_helpers::SharedBuffer;
use crate::monitor::{DeviceSpec, MonitorSession, SessionOptions};
use crate::render::PlainHighlighter;
use std::fs;
use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;

fn config(log_dir: &std::path::Path) -> MonitorConfig {
    let mut config = MonitorConfig::default();
    config.log_dir = log_dir.to_path_buf();
    config.read_timeout_ms = 20;
    config.start_stagger_ms = 0;
    config.shutdown_grace_ms = 200;
    config.identity.attempts = 5;
    config.identity.poll_interval_ms = 10;
    config
}

#[tokio::test]
async fn devices_that_finish_end_the_session() {
    // Arrange
    let dir = tempdir().unwrap();
    let out = SharedBuffer::default();
    let mut session = MonitorSession::start_with_writers(
        SessionOptions {
            config: config(dir.path()),
            show_matrix: false,
            highlighter: Arc::new(PlainHighlighter),
        },
        out.clone(),
        tokio::io::sink(),
    );

    // Act
    session.spawn_device("a", Cursor::new(b"Node ID: 1\n100,1,2,1.52,-70\n".to_vec()), None);
    session.spawn_device("b", Cursor::new(b"100,2,1,1.49,-69\n".to_vec()), None);
    session.run_until_stopped().await;
    let outcome = session.finish().await;

    // Assert
    assert_eq!(outcome.devices.len(), 2);
    assert!(outcome.failures.is_empty());
    assert!(outcome.aborted.is_empty());
    assert_eq!(outcome.lines_displayed, 3);
    assert_eq!(outcome.snapshot.total_ranges(), 2);

    let printed = out.contents();
    assert!(printed.contains("[Node 1] 100,1,2,1.52,-70"));
    assert!(printed.contains("[Node 2] 100,2,1,1.49,-69"));
}

#[tokio::test]
async fn unopenable_device_does_not_stop_the_others() {
    let dir = tempdir().unwrap();
    let capture = dir.path().join("capture.txt");
    fs::write(&capture, "100,3,1,2.00,-70\n").unwrap();

    let mut session = MonitorSession::start_with_writers(
        SessionOptions {
            config: config(&dir.path().join("logs")),
            show_matrix: false,
            highlighter: Arc::new(PlainHighlighter),
        },
        tokio::io::sink(),
        tokio::io::sink(),
    );

    let missing: DeviceSpec = dir.path().join("ttyACM7").display().to_string().parse().unwrap();
    let present: DeviceSpec = format!("{}=3", capture.display()).parse().unwrap();
    session.spawn_path(&missing).await;
    session.spawn_path(&present).await;
    session.run_until_stopped().await;
    let outcome = session.finish().await;

    assert_eq!(outcome.failures.len(), 1);
    assert!(outcome.failures[0].device.ends_with("ttyACM7"));
    assert_eq!(outcome.devices.len(), 1);
    assert_eq!(outcome.devices[0].node, NodeId(3));
    assert_eq!(outcome.snapshot.total_ranges(), 1);
}

#[tokio::test(start_paused = true)]
async fn finish_stops_idle_devices_within_grace() {
    let dir = tempdir().unwrap();
    let view_out = SharedBuffer::default();
    let mut session = MonitorSession::start_with_writers(
        SessionOptions {
            config: config(dir.path()),
            show_matrix: true,
            highlighter: Arc::new(PlainHighlighter),
        },
        tokio::io::sink(),
        view_out.clone(),
    );

    let (_device, host) = tokio::io::duplex(64);
    session.spawn_device("idle", tokio::io::BufReader::new(host), Some(NodeId(1)));

    let shutdown = session.shutdown_handle();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(5)).await;
        shutdown.trigger();
    });

    session.run_until_stopped().await;
    let outcome = session.finish().await;

    assert_eq!(outcome.devices.len(), 1);
    assert!(outcome.aborted.is_empty());
    // the matrix view redrew at least once while waiting
    assert!(view_out.contents().contains("No ranging data yet..."));
}

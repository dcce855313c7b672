use crate::ingest::NodeId;
use crate::monitor::{DeviceError, DeviceLog, format_log_line, log_file_name, strip_timestamp_prefix};
use chrono::{Local, TimeZone};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::tempdir;

#[test]
fn file_name_embeds_node_and_session_start() {
    let start = Local.with_ymd_and_hms(2025, 1, 15, 14, 30, 5).unwrap();
    assert_eq!(log_file_name(NodeId(2), start), "node_2_20250115_143005.log");
}

#[test]
fn logged_line_round_trips_through_prefix_strip() {
    let at = Local.with_ymd_and_hms(2025, 1, 15, 14, 30, 5).unwrap();
    let logged = format_log_line(at, "100,1,2,1.50,-70");

    assert_eq!(logged, "[2025-01-15 14:30:05.000] 100,1,2,1.50,-70\n");
    assert_eq!(strip_timestamp_prefix(logged.trim_end()), "100,1,2,1.50,-70");
}

#[test]
fn bracketed_device_text_is_not_mistaken_for_a_stamp() {
    assert_eq!(strip_timestamp_prefix("[DISCOVER] node 2"), "[DISCOVER] node 2");
    assert_eq!(strip_timestamp_prefix("[unterminated"), "[unterminated");
    assert_eq!(strip_timestamp_prefix("100,1,2,1.5,-70"), "100,1,2,1.5,-70");
}

#[tokio::test]
async fn create_makes_directory_and_appends_lines() {
    let dir = tempdir().unwrap();
    let log_dir = dir.path().join("nested/logs");
    let start = Local::now();

    let mut log = DeviceLog::create(&log_dir, NodeId(7), start).await.unwrap();
    log.append(Local::now(), "first").await.unwrap();
    log.append(Local::now(), "second").await.unwrap();
    let path = log.path().to_path_buf();
    log.close().await.unwrap();

    assert_eq!(path.parent().unwrap(), log_dir);
    let contents = fs::read_to_string(&path).unwrap();
    let bodies: Vec<_> = contents.lines().map(strip_timestamp_prefix).collect();
    assert_eq!(bodies, vec!["first", "second"]);
}

#[tokio::test]
async fn unusable_log_dir_is_reported() {
    let dir = tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    fs::write(&blocker, "").unwrap();

    let err = DeviceLog::create(&blocker, NodeId(1), Local::now())
        .await
        .unwrap_err();

    assert!(matches!(err, DeviceError::LogDir { .. }));
}

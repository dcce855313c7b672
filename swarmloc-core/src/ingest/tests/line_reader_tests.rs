use crate::ingest::{LineReader, ReadOutcome};
use std::io::Cursor;
use std::time::Duration;
use tokio::io::{AsyncWriteExt, BufReader};

const WAIT: Duration = Duration::from_millis(100);

#[tokio::test]
async fn frames_lines_and_reports_end_of_stream() {
    let mut reader = LineReader::new(Cursor::new(b"first\r\nsecond\nlast".to_vec()));

    assert_eq!(
        reader.next_line(WAIT).await.unwrap(),
        ReadOutcome::Line("first".into())
    );
    assert_eq!(
        reader.next_line(WAIT).await.unwrap(),
        ReadOutcome::Line("second".into())
    );
    assert_eq!(
        reader.next_line(WAIT).await.unwrap(),
        ReadOutcome::Line("last".into())
    );
    assert_eq!(reader.next_line(WAIT).await.unwrap(), ReadOutcome::Closed);
    assert_eq!(reader.next_line(WAIT).await.unwrap(), ReadOutcome::Closed);
}

#[tokio::test]
async fn invalid_utf8_is_replaced() {
    let mut reader = LineReader::new(Cursor::new(b"ok \xff\xfe ERROR\n".to_vec()));

    let ReadOutcome::Line(line) = reader.next_line(WAIT).await.unwrap() else {
        panic!("expected a line");
    };
    assert!(line.starts_with("ok "));
    assert!(line.ends_with(" ERROR"));
}

#[tokio::test(start_paused = true)]
async fn idle_stream_times_out_without_losing_partial_line() {
    let (mut device, host) = tokio::io::duplex(64);
    let mut reader = LineReader::new(BufReader::new(host));

    assert_eq!(reader.next_line(WAIT).await.unwrap(), ReadOutcome::Idle);

    device.write_all(b"100,1,2,").await.unwrap();
    assert_eq!(reader.next_line(WAIT).await.unwrap(), ReadOutcome::Idle);

    device.write_all(b"1.50,-70\n").await.unwrap();
    assert_eq!(
        reader.next_line(WAIT).await.unwrap(),
        ReadOutcome::Line("100,1,2,1.50,-70".into())
    );

    drop(device);
    assert_eq!(reader.next_line(WAIT).await.unwrap(), ReadOutcome::Closed);
}

use crate::cli::monitor::block_on_bounded;
use std::time::{Duration, Instant};

#[test]
fn parked_blocking_read_does_not_hold_the_runtime_open() {
    // Arrange
    let grace = Duration::from_millis(100);
    let started = Instant::now();

    // Act
    let output = block_on_bounded(grace, async {
        // stands in for a read(2) on a device that never sends anything
        let _parked = tokio::task::spawn_blocking(|| std::thread::sleep(Duration::from_secs(30)));
        tokio::time::sleep(Duration::from_millis(20)).await;
        7
    })
    .unwrap();

    // Assert
    assert_eq!(output, 7);
    assert!(started.elapsed() < Duration::from_secs(5));
}

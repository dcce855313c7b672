use std::io;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::time;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    Line(String),
    /// Nothing arrived within the wait.
    Idle,
    /// End of stream.
    Closed,
}

/// Line framing over a device byte stream with a bounded wait per read.
///
/// Bytes that arrive before a wait expires are kept and completed by the next
/// call, so a timeout never splits or drops a line. Invalid UTF-8 is replaced
/// rather than rejected.
pub struct LineReader<R> {
    inner: R,
    buf: Vec<u8>,
}

impl<R> LineReader<R>
where
    R: AsyncBufRead + Unpin,
{
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: Vec::with_capacity(128),
        }
    }

    pub async fn next_line(&mut self, wait: Duration) -> io::Result<ReadOutcome> {
        match time::timeout(wait, self.inner.read_until(b'\n', &mut self.buf)).await {
            Err(_elapsed) => Ok(ReadOutcome::Idle),
            Ok(Err(e)) => Err(e),
            Ok(Ok(0)) if self.buf.is_empty() => Ok(ReadOutcome::Closed),
            Ok(Ok(_)) => Ok(ReadOutcome::Line(self.take_line())),
        }
    }

    fn take_line(&mut self) -> String {
        let line = String::from_utf8_lossy(&self.buf)
            .trim_end_matches(['\r', '\n'])
            .to_string();
        self.buf.clear();
        line
    }
}

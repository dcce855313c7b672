use crate::ingest::NodeId;
use crate::render::Highlighter;
use chrono::{DateTime, Local};
use std::sync::Arc;
use thiserror::Error;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;

/// One device line on its way to the terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    pub node: NodeId,
    pub received_at: DateTime<Local>,
    pub line: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("output sink closed")]
pub struct SinkClosed;

/// Producer side of the display queue, cloned into every device task.
#[derive(Debug, Clone)]
pub struct OutputSink {
    tx: mpsc::Sender<RenderedLine>,
}

impl OutputSink {
    /// Waits for room when the queue is full; lines are never dropped.
    pub async fn send(&self, line: RenderedLine) -> Result<(), SinkClosed> {
        self.tx.send(line).await.map_err(|_| SinkClosed)
    }
}

#[derive(Debug)]
pub struct OutputReceiver {
    rx: mpsc::Receiver<RenderedLine>,
}

impl OutputReceiver {
    pub async fn recv(&mut self) -> Option<RenderedLine> {
        self.rx.recv().await
    }
}

pub fn output_channel(capacity: usize) -> (OutputSink, OutputReceiver) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (OutputSink { tx }, OutputReceiver { rx })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    /// Print every line as it arrives.
    Lines,
    /// Drain without printing; the matrix view owns the terminal.
    Silent,
}

pub fn format_rendered(line: &RenderedLine, highlighter: &dyn Highlighter) -> String {
    let tag = highlighter.node(line.node, &format!("[Node {}]", line.node));
    format!("{tag} {}", line.line)
}

/// Consume the queue until every producer is gone. Returns the number of
/// lines drained.
pub async fn run_display<W>(
    mut rx: OutputReceiver,
    mode: DisplayMode,
    highlighter: Arc<dyn Highlighter>,
    mut out: W,
) -> u64
where
    W: AsyncWrite + Unpin + Send,
{
    let mut drained = 0u64;

    while let Some(line) = rx.recv().await {
        drained += 1;

        if mode == DisplayMode::Silent {
            continue;
        }

        let mut text = format_rendered(&line, highlighter.as_ref());
        text.push('\n');
        if let Err(e) = write_flush(&mut out, &text).await {
            tracing::warn!(error = %e, "display write failed, switching to silent drain");
            return drained + drain(&mut rx).await;
        }
    }

    drained
}

/// Write `text` in full and flush it through to the terminal.
pub(crate) async fn write_flush<W>(out: &mut W, text: &str) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    out.write_all(text.as_bytes()).await?;
    out.flush().await
}

async fn drain(rx: &mut OutputReceiver) -> u64 {
    let mut n = 0;
    while rx.recv().await.is_some() {
        n += 1;
    }
    n
}

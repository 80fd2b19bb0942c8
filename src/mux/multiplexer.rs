// src/mux/multiplexer.rs

//! Per-child output multiplexer.
//!
//! A child's stdout and stderr share one pipe; a reader task pushes its raw
//! lines into a channel drained by a single `Multiplexer`, so lines from one
//! child keep the order they were written in while different children
//! interleave freely.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{trace, warn};

use crate::context::SupervisorContext;
use crate::manifest::ManifestEntry;

use super::console::Console;
use super::format::{format_line, render_terminal, timestamp_now, truncate_line};
use super::sink::LogSink;

#[derive(Debug)]
pub struct Multiplexer {
    name: String,
    color: Option<u8>,
    max_line_len: usize,
    sink: Arc<LogSink>,
    console: Arc<dyn Console>,
}

impl Multiplexer {
    pub fn new(entry: &ManifestEntry, ctx: &SupervisorContext) -> Self {
        let color = ctx.color_enabled().then(|| entry.ansi_color());
        Self {
            name: entry.name.clone(),
            color,
            max_line_len: ctx.settings.max_line_len,
            sink: Arc::clone(&ctx.sink),
            console: Arc::clone(&ctx.console),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Label, timestamp and fan out one message.
    pub fn emit(&self, message: &str) {
        self.emit_at(&timestamp_now(), message);
    }

    /// Like [`emit`](Self::emit) with an explicit timestamp.
    pub fn emit_at(&self, timestamp: &str, message: &str) {
        self.emit_raw_at(timestamp, message.as_bytes());
    }

    /// Emit one raw output line. Truncation counts bytes; invalid UTF-8 is
    /// replaced lossily.
    pub fn emit_raw_at(&self, timestamp: &str, raw: &[u8]) {
        let message = truncate_line(raw, self.max_line_len);

        self.console
            .write_line(&render_terminal(timestamp, &self.name, &message, self.color));

        let plain = format_line(timestamp, &self.name, &message);
        if let Err(e) = self.sink.append_line(&plain) {
            warn!(
                name = %self.name,
                log = %self.sink.path().display(),
                error = %e,
                "failed to append to log file"
            );
        }
    }

    /// Emit every line received until all senders are gone.
    pub async fn drain(self, mut rx: mpsc::Receiver<Vec<u8>>) {
        while let Some(line) = rx.recv().await {
            self.emit_raw_at(&timestamp_now(), &line);
        }
        trace!(name = %self.name, "output stream closed");
    }
}

/// Forward every line of `reader` into `tx`, newline stripped.
///
/// Lines stay raw bytes until they are emitted; a final line without a
/// trailing newline is still forwarded.
pub fn spawn_line_reader<R>(reader: R, tx: mpsc::Sender<Vec<u8>>) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut reader = BufReader::new(reader);
        let mut buf = Vec::new();

        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break,
                Ok(_) => {
                    if tx.send(strip_newline(&buf).to_vec()).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!(error = %e, "error reading child output");
                    break;
                }
            }
        }
    })
}

fn strip_newline(buf: &[u8]) -> &[u8] {
    let buf = buf.strip_suffix(b"\n").unwrap_or(buf);
    buf.strip_suffix(b"\r").unwrap_or(buf)
}

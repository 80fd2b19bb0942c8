// src/mux/sink.rs

//! Durable, append-only log file shared by every multiplexer.
//!
//! Rotation happens exactly once, when the sink is opened: the previous
//! run's log is copied aside, the active log is truncated and a run banner
//! is written before any child output.

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use anyhow::Context;
use chrono::Local;
use tracing::{debug, info};

use crate::errors::Result;

#[derive(Debug)]
pub struct LogSink {
    path: PathBuf,
    file: Mutex<File>,
}

impl LogSink {
    /// Rotate `active` into `previous` (if it exists) and open a fresh
    /// active log with a run-boundary banner.
    pub fn rotate(active: &Path, previous: &Path) -> Result<Self> {
        let rotated = rotate_logs(active, previous)?;

        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(active)
            .with_context(|| format!("opening log file {}", active.display()))?;

        let banner = run_banner(std::process::id());
        file.write_all(format!("{banner}\n").as_bytes())
            .with_context(|| format!("writing run banner to {}", active.display()))?;

        info!(
            log = %active.display(),
            previous = %previous.display(),
            rotated,
            "log sink ready"
        );

        Ok(Self {
            path: active.to_path_buf(),
            file: Mutex::new(file),
        })
    }

    /// Append one line. The whole line (plus newline) goes out in a single
    /// `write_all` under the lock so concurrent writers never interleave.
    pub fn append_line(&self, line: &str) -> std::io::Result<()> {
        let mut buf = String::with_capacity(line.len() + 1);
        buf.push_str(line);
        buf.push('\n');

        let mut file = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        file.write_all(buf.as_bytes())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Copy the active log aside as the previous-run log.
///
/// Returns `Ok(true)` if there was an active log to rotate.
pub fn rotate_logs(active: &Path, previous: &Path) -> Result<bool> {
    match fs::copy(active, previous) {
        Ok(bytes) => {
            debug!(from = %active.display(), to = %previous.display(), bytes, "rotated previous run log");
            Ok(true)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(anyhow::Error::new(e)
            .context(format!("rotating {} to {}", active.display(), previous.display()))
            .into()),
    }
}

fn run_banner(pid: u32) -> String {
    format!(
        "===== procmux run started {} (pid {pid}) =====",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    )
}

// src/guard.rs

//! Single-instance guard backed by a PID file.
//!
//! At most one supervisor may run per working directory. The guard file
//! holds the owner's pid; a guard whose pid is no longer alive is stale and
//! gets replaced. The file is removed on every exit path: explicitly via
//! [`RunGuard::release`], or on drop as a fallback.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Context;
use tracing::{debug, info, warn};

use crate::errors::{ProcmuxError, Result};
use crate::exec::signal::pid_is_alive;

static TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

#[derive(Debug)]
pub struct RunGuard {
    path: PathBuf,
    pid: u32,
    released: bool,
}

impl RunGuard {
    /// Take the guard for the current process.
    pub fn acquire(path: &Path) -> Result<Self> {
        Self::acquire_for(path, std::process::id())
    }

    /// Take the guard on behalf of `pid`.
    ///
    /// Fails with [`ProcmuxError::AlreadyRunning`] if the file names a live
    /// process; a stale file is removed first.
    pub fn acquire_for(path: &Path, pid: u32) -> Result<Self> {
        match read_guard_pid(path)? {
            Some(existing) if pid_is_alive(existing) => {
                return Err(ProcmuxError::AlreadyRunning {
                    pid: existing,
                    path: path.to_path_buf(),
                });
            }
            Some(existing) => {
                info!(path = %path.display(), stale_pid = existing, "removing stale guard file");
                remove_if_exists(path)?;
            }
            None => {}
        }

        if !publish_guard(path, pid)? {
            // Another instance created the file after our check.
            let winner = read_guard_pid(path)?.unwrap_or(0);
            return Err(ProcmuxError::AlreadyRunning {
                pid: winner,
                path: path.to_path_buf(),
            });
        }
        debug!(path = %path.display(), pid, "guard acquired");

        Ok(Self {
            path: path.to_path_buf(),
            pid,
            released: false,
        })
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the guard file.
    pub fn release(mut self) -> Result<()> {
        self.released = true;
        remove_if_exists(&self.path)?;
        debug!(path = %self.path.display(), "guard released");
        Ok(())
    }
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        if !self.released {
            if let Err(e) = remove_if_exists(&self.path) {
                warn!(path = %self.path.display(), error = %e, "failed to remove guard file");
            }
        }
    }
}

/// Pid recorded in the guard file, if there is one.
///
/// A file that can't be parsed is treated like a stale guard: it names no
/// live process.
pub fn read_guard_pid(path: &Path) -> Result<Option<u32>> {
    let contents = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    match contents.trim().parse::<u32>() {
        Ok(pid) => Ok(Some(pid)),
        Err(_) => {
            warn!(path = %path.display(), "guard file does not contain a pid; treating as stale");
            Ok(Some(0))
        }
    }
}

/// Create the guard file holding `pid`, failing if it already exists.
///
/// The pid is written to a private temp file that is then hard-linked into
/// place, so other instances never observe a guard without its pid.
/// Returns `Ok(false)` if someone else's guard is already there.
fn publish_guard(path: &Path, pid: u32) -> Result<bool> {
    let attempt = TMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(format!(".{}.{attempt}.tmp", std::process::id()));
    let tmp = PathBuf::from(tmp_name);

    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&tmp)
        .with_context(|| format!("creating guard file {}", tmp.display()))?;
    file.write_all(format!("{pid}\n").as_bytes())
        .with_context(|| format!("writing guard file {}", tmp.display()))?;
    drop(file);

    let linked = fs::hard_link(&tmp, path);
    remove_if_exists(&tmp)?;
    match linked {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(anyhow::Error::new(e)
            .context(format!("creating guard file {}", path.display()))
            .into()),
    }
}

fn remove_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

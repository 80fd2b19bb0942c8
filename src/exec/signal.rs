// src/exec/signal.rs

//! Thin wrappers around process signalling.
//!
//! Children are spawned as leaders of their own process group, so
//! terminating a child signals the whole group: the `sh -c` wrapper and
//! whatever it started.

#[cfg(unix)]
use nix::errno::Errno;
#[cfg(unix)]
use nix::sys::signal::{Signal, kill, killpg};
#[cfg(unix)]
use nix::unistd::Pid;
use tracing::debug;

/// Whether `pid` names a live process.
///
/// `pid` 0 and values that don't fit a `pid_t` are never alive.
#[cfg(unix)]
pub fn pid_is_alive(pid: u32) -> bool {
    let Some(pid) = to_nix_pid(pid) else {
        return false;
    };
    match kill(pid, None) {
        Ok(()) => true,
        // Exists, but belongs to someone else.
        Err(Errno::EPERM) => true,
        Err(_) => false,
    }
}

#[cfg(not(unix))]
pub fn pid_is_alive(_pid: u32) -> bool {
    false
}

/// Ask the process group led by `pid` to terminate (SIGTERM).
pub fn terminate_group(pid: u32) {
    #[cfg(unix)]
    send_group(pid, Signal::SIGTERM);
    #[cfg(not(unix))]
    debug!(pid, "process group signalling is not supported on this platform");
}

/// Forcefully kill the process group led by `pid` (SIGKILL).
pub fn kill_group(pid: u32) {
    #[cfg(unix)]
    send_group(pid, Signal::SIGKILL);
    #[cfg(not(unix))]
    debug!(pid, "process group signalling is not supported on this platform");
}

#[cfg(unix)]
fn send_group(pid: u32, signal: Signal) {
    let Some(pgid) = to_nix_pid(pid) else {
        return;
    };
    match killpg(pgid, signal) {
        Ok(()) => debug!(pid, ?signal, "signalled process group"),
        Err(Errno::ESRCH) => debug!(pid, ?signal, "process group already gone"),
        Err(e) => tracing::warn!(pid, ?signal, error = %e, "failed to signal process group"),
    }
}

#[cfg(unix)]
fn to_nix_pid(pid: u32) -> Option<Pid> {
    match i32::try_from(pid) {
        Ok(raw) if raw > 0 => Some(Pid::from_raw(raw)),
        _ => None,
    }
}

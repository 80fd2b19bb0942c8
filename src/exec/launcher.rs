// src/exec/launcher.rs

//! Spawning manifest entries.
//!
//! Each entry runs as `sh -c <command>` (`cmd /C` on Windows). On Unix the
//! child's stdout and stderr are the same pipe, so its output reaches the
//! entry's own [`Multiplexer`] in the order it was written. A waiter task
//! reaps the child and reports its exit code to the supervisor as a
//! [`SupervisorEvent::ChildExited`].

use std::io;
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;

use tokio::process::{Child, Command};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::context::SupervisorContext;
use crate::engine::SupervisorEvent;
use crate::manifest::ManifestEntry;
use crate::mux::{Multiplexer, spawn_line_reader};

use super::process_table::{ProcessTable, Slot};

/// Exit code recorded for an entry whose command could not be started.
pub const SPAWN_FAILURE_EXIT_CODE: i32 = 127;

const LINE_CHANNEL_CAPACITY: usize = 256;

/// Result of launching one entry.
#[derive(Debug)]
pub struct Launched {
    pub slot: Slot,
    /// Task draining the child's output; finishes once every writer of the
    /// output pipe is gone. `None` when the spawn failed.
    pub output: Option<JoinHandle<()>>,
}

/// Spawns manifest entries into a shared [`ProcessTable`].
#[derive(Debug, Clone)]
pub struct Launcher {
    ctx: Arc<SupervisorContext>,
    table: ProcessTable,
    events: mpsc::UnboundedSender<SupervisorEvent>,
}

impl Launcher {
    pub fn new(
        ctx: Arc<SupervisorContext>,
        table: ProcessTable,
        events: mpsc::UnboundedSender<SupervisorEvent>,
    ) -> Self {
        Self { ctx, table, events }
    }

    /// Start one entry. Never fails: a spawn error is logged through the
    /// entry's multiplexer and reported as an exit with
    /// [`SPAWN_FAILURE_EXIT_CODE`].
    pub fn launch(&self, entry: ManifestEntry) -> Launched {
        let mux = Multiplexer::new(&entry, &self.ctx);
        let slot = self.table.register(entry.clone());

        let mut cmd = shell_command(&entry.command);
        cmd.envs(self.ctx.env.iter()).stdin(Stdio::null());
        #[cfg(unix)]
        cmd.process_group(0);

        let (line_tx, line_rx) = mpsc::channel::<Vec<u8>>(LINE_CHANNEL_CAPACITY);
        let child = match spawn_with_merged_output(cmd, line_tx) {
            Ok(child) => child,
            Err(e) => {
                error!(name = %entry.name, command = %entry.command, error = %e, "failed to spawn process");
                mux.emit(&format!("failed to start: {e}"));
                self.report_exit(slot, SPAWN_FAILURE_EXIT_CODE);
                return Launched { slot, output: None };
            }
        };

        let pid = child.id();
        self.table.mark_running(slot, pid);
        info!(name = %entry.name, index = entry.index, pid = ?pid, "process started");

        match pid {
            Some(pid) => mux.emit(&format!("started with pid {pid}")),
            None => mux.emit("started"),
        }

        let output = tokio::spawn(mux.drain(line_rx));
        tokio::spawn(wait_for_exit(child, slot, entry.name, self.events.clone()));

        Launched {
            slot,
            output: Some(output),
        }
    }

    /// Start every entry in order without waiting for any of them.
    pub fn launch_all<I>(&self, entries: I) -> Vec<Launched>
    where
        I: IntoIterator<Item = ManifestEntry>,
    {
        entries.into_iter().map(|entry| self.launch(entry)).collect()
    }

    fn report_exit(&self, slot: Slot, code: i32) {
        if self
            .events
            .send(SupervisorEvent::ChildExited { slot, code })
            .is_err()
        {
            debug!(slot, "supervisor gone; dropping exit event");
        }
    }
}

/// Spawn `cmd` with stdout and stderr both writing into one pipe whose
/// lines are forwarded to `lines`.
#[cfg(unix)]
fn spawn_with_merged_output(mut cmd: Command, lines: mpsc::Sender<Vec<u8>>) -> io::Result<Child> {
    use std::os::fd::OwnedFd;
    use tokio::net::unix::pipe;

    let (reader, writer) = io::pipe()?;
    let reader = pipe::Receiver::from_owned_fd(OwnedFd::from(reader))?;
    cmd.stdout(writer.try_clone()?).stderr(writer);

    let child = cmd.spawn()?;
    // The command still holds our copies of the write end; EOF only
    // arrives once they are closed.
    drop(cmd);

    spawn_line_reader(reader, lines);
    Ok(child)
}

#[cfg(not(unix))]
fn spawn_with_merged_output(mut cmd: Command, lines: mpsc::Sender<Vec<u8>>) -> io::Result<Child> {
    cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
    let mut child = cmd.spawn()?;
    drop(cmd);

    if let Some(stdout) = child.stdout.take() {
        spawn_line_reader(stdout, lines.clone());
    }
    if let Some(stderr) = child.stderr.take() {
        spawn_line_reader(stderr, lines);
    }
    Ok(child)
}

/// Shell invocation appropriate for the platform.
pub fn shell_command(command: &str) -> Command {
    if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(command);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(command);
        c
    }
}

async fn wait_for_exit(
    mut child: Child,
    slot: Slot,
    name: String,
    events: mpsc::UnboundedSender<SupervisorEvent>,
) {
    let code = match child.wait().await {
        Ok(status) => exit_code_of(status),
        Err(e) => {
            error!(name = %name, error = %e, "failed to wait for process");
            -1
        }
    };

    info!(name = %name, exit_code = code, "process exited");
    let _ = events.send(SupervisorEvent::ChildExited { slot, code });
}

/// Exit code of a finished child; a signal death maps to `128 + signal`.
pub fn exit_code_of(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}

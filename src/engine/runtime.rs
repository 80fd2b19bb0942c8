// src/engine/runtime.rs

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::context::SupervisorContext;
use crate::exec::signal::{kill_group, terminate_group};
use crate::exec::{Launcher, ProcessTable, Slot};
use crate::manifest::ManifestEntry;

use super::core::SupervisorCore;
use super::{CoreCommand, LifecyclePhase, ShutdownSignal, SupervisorEvent};

/// After a shutdown, how long child output may keep draining before the
/// supervisor returns anyway (e.g. a process outside the group still
/// holding the pipe).
const SHUTDOWN_DRAIN_TIMEOUT: Duration = Duration::from_millis(500);

/// Async shell around [`SupervisorCore`].
///
/// Owns the event channel every waiter task, signal forwarder and timer
/// reports into, launches the manifest, and executes the commands the core
/// hands back (signalling process groups, arming the grace timer).
pub struct Supervisor {
    ctx: Arc<SupervisorContext>,
    core: SupervisorCore,
    table: ProcessTable,
    outputs: Vec<JoinHandle<()>>,
    event_tx: mpsc::UnboundedSender<SupervisorEvent>,
    event_rx: mpsc::UnboundedReceiver<SupervisorEvent>,
}

impl fmt::Debug for Supervisor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Supervisor")
            .field("core", &self.core)
            .finish_non_exhaustive()
    }
}

impl Supervisor {
    pub fn new(ctx: Arc<SupervisorContext>) -> Self {
        let table = ProcessTable::new();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        Self {
            ctx,
            core: SupervisorCore::new(table.clone()),
            table,
            outputs: Vec::new(),
            event_tx,
            event_rx,
        }
    }

    /// Sender for injecting events (signals in tests, timers).
    pub fn event_sender(&self) -> mpsc::UnboundedSender<SupervisorEvent> {
        self.event_tx.clone()
    }

    /// Shared view of the managed processes.
    pub fn table(&self) -> ProcessTable {
        self.table.clone()
    }

    pub fn phase(&self) -> LifecyclePhase {
        self.core.phase()
    }

    /// Relay shutdown signals from `signals` onto the event channel.
    pub fn forward_signals(&self, mut signals: mpsc::UnboundedReceiver<ShutdownSignal>) {
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            while let Some(signal) = signals.recv().await {
                if tx.send(SupervisorEvent::ShutdownRequested(signal)).is_err() {
                    break;
                }
            }
        });
    }

    /// Spawn every entry in manifest order. Spawning never waits for output.
    pub fn launch<I>(&mut self, entries: I) -> Vec<Slot>
    where
        I: IntoIterator<Item = ManifestEntry>,
    {
        let launcher = Launcher::new(
            Arc::clone(&self.ctx),
            self.table.clone(),
            self.event_tx.clone(),
        );
        let slots = launcher
            .launch_all(entries)
            .into_iter()
            .map(|launched| {
                self.outputs.extend(launched.output);
                launched.slot
            })
            .collect::<Vec<_>>();
        info!(count = slots.len(), "manifest launched");
        slots
    }

    /// Main event loop. Returns the aggregated exit code.
    ///
    /// - Waits until every child exited and all of their output is written, or
    /// - on a shutdown signal, terminates all children, waits up to the
    ///   grace period, escalates once and returns after a bounded drain.
    pub async fn run(mut self) -> i32 {
        let mut step = self.core.begin_running();
        let mut interrupted = false;

        loop {
            for command in step.commands.drain(..) {
                self.execute_command(command);
            }

            if !step.keep_running {
                break;
            }

            let Some(event) = self.event_rx.recv().await else {
                debug!("supervisor event channel closed");
                break;
            };

            debug!(?event, "supervisor received event");
            interrupted |= matches!(event, SupervisorEvent::ShutdownRequested(_));
            step = self.core.step(event);
        }

        self.flush_output(interrupted).await;

        let code = self.core.finish();
        info!(exit_code = code, "supervisor finished");
        code
    }

    /// Wait for the output tasks.
    ///
    /// After a normal finish this waits for all of it, unless a shutdown
    /// signal arrives meanwhile (a backgrounded grandchild may hold a pipe
    /// open indefinitely); then every process group still around is killed.
    /// After a shutdown the wait is bounded.
    async fn flush_output(&mut self, interrupted: bool) {
        let mut outputs = std::mem::take(&mut self.outputs);

        if !interrupted {
            while let Some(output) = outputs.last_mut() {
                let finished = tokio::select! {
                    _ = output => true,
                    event = self.event_rx.recv() => match event {
                        Some(SupervisorEvent::ShutdownRequested(signal)) => {
                            info!(%signal, "shutdown requested while flushing output");
                            for pid in self.table.snapshot().iter().filter_map(|p| p.pid) {
                                kill_group(pid);
                            }
                            break;
                        }
                        Some(_) => false,
                        None => break,
                    },
                };
                if finished {
                    outputs.pop();
                }
            }
            if outputs.is_empty() {
                return;
            }
        }

        let deadline = Instant::now() + SHUTDOWN_DRAIN_TIMEOUT;
        for output in outputs {
            if tokio::time::timeout_at(deadline, output).await.is_err() {
                debug!("output still open after shutdown; not waiting for it");
                break;
            }
        }
    }

    fn execute_command(&self, command: CoreCommand) {
        match command {
            CoreCommand::TerminateAll => {
                for pid in self.table.live_pids() {
                    terminate_group(pid);
                }
            }
            CoreCommand::StartGraceTimer => {
                let tx = self.event_tx.clone();
                let grace = self.ctx.settings.grace_period;
                debug!(?grace, "grace period started");
                tokio::spawn(async move {
                    tokio::time::sleep(grace).await;
                    let _ = tx.send(SupervisorEvent::GraceElapsed);
                });
            }
            CoreCommand::KillAll => {
                for pid in self.table.live_pids() {
                    kill_group(pid);
                }
            }
        }
    }
}

// src/engine/event_handlers.rs

//! Event handling logic for the supervisor core.

use tracing::{debug, info, warn};

use crate::engine::{LifecyclePhase, ShutdownSignal};
use crate::exec::{ProcessTable, Slot};

/// Command produced by the core, to be executed by the outer IO shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreCommand {
    /// SIGTERM every live process group.
    TerminateAll,
    /// Arm the grace-period timer.
    StartGraceTimer,
    /// SIGKILL every process group still alive.
    KillAll,
}

/// Decision returned by the core after handling a single event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreStep {
    pub commands: Vec<CoreCommand>,
    /// Whether the outer loop should keep waiting for events.
    pub keep_running: bool,
}

impl CoreStep {
    pub fn continue_with(commands: Vec<CoreCommand>) -> Self {
        Self {
            commands,
            keep_running: true,
        }
    }

    pub fn stop_with(commands: Vec<CoreCommand>) -> Self {
        Self {
            commands,
            keep_running: false,
        }
    }
}

/// Record a child exit; stop once every child has exited.
pub fn handle_child_exit(
    table: &ProcessTable,
    phase: &mut LifecyclePhase,
    slot: Slot,
    code: i32,
) -> CoreStep {
    if !table.mark_exited(slot, code) {
        debug!(slot, code, "ignoring duplicate or unknown exit");
    }

    if table.all_exited() {
        debug!("all processes exited");
        *phase = LifecyclePhase::Exited;
        return CoreStep::stop_with(Vec::new());
    }

    CoreStep::continue_with(Vec::new())
}

/// First signal: terminate everything and start the grace period.
/// A second signal while terminating escalates immediately.
pub fn handle_shutdown(
    table: &ProcessTable,
    phase: &mut LifecyclePhase,
    signal: ShutdownSignal,
) -> CoreStep {
    match *phase {
        LifecyclePhase::Terminating => {
            warn!(%signal, "second signal while terminating; killing remaining processes");
            *phase = LifecyclePhase::Exited;
            CoreStep::stop_with(vec![CoreCommand::KillAll])
        }
        LifecyclePhase::Exited => CoreStep::stop_with(Vec::new()),
        _ => {
            info!(%signal, live = table.live_pids().len(), "shutdown requested; terminating processes");
            *phase = LifecyclePhase::Terminating;
            if table.all_exited() {
                *phase = LifecyclePhase::Exited;
                return CoreStep::stop_with(Vec::new());
            }
            CoreStep::continue_with(vec![CoreCommand::TerminateAll, CoreCommand::StartGraceTimer])
        }
    }
}

/// Grace period over: escalate once and stop waiting.
pub fn handle_grace_elapsed(table: &ProcessTable, phase: &mut LifecyclePhase) -> CoreStep {
    if *phase != LifecyclePhase::Terminating {
        return CoreStep::continue_with(Vec::new());
    }

    let survivors = table.live_pids();
    *phase = LifecyclePhase::Exited;
    if survivors.is_empty() {
        return CoreStep::stop_with(Vec::new());
    }

    warn!(?survivors, "grace period elapsed; killing remaining processes");
    CoreStep::stop_with(vec![CoreCommand::KillAll])
}

// src/engine/core.rs

//! Synchronous supervisor state machine.
//!
//! Consumes [`SupervisorEvent`]s and produces:
//! - an updated phase and process table
//! - a list of commands describing what the IO shell should do next
//!
//! The async shell (`engine::runtime::Supervisor`) reads events from the
//! channel, sends signals and arms timers. The core itself has no channels,
//! no Tokio types and performs no IO, so it is unit tested directly.

use crate::engine::event_handlers::{
    CoreStep, handle_child_exit, handle_grace_elapsed, handle_shutdown,
};
use crate::engine::{LifecyclePhase, SupervisorEvent};
use crate::exec::ProcessTable;

#[derive(Debug)]
pub struct SupervisorCore {
    table: ProcessTable,
    phase: LifecyclePhase,
}

impl SupervisorCore {
    pub fn new(table: ProcessTable) -> Self {
        Self {
            table,
            phase: LifecyclePhase::Launching,
        }
    }

    pub fn phase(&self) -> LifecyclePhase {
        self.phase
    }

    pub fn table(&self) -> &ProcessTable {
        &self.table
    }

    /// Launching is done; start waiting. Stops immediately when nothing
    /// is left to wait for (empty manifest, every spawn already failed).
    pub fn begin_running(&mut self) -> CoreStep {
        if self.phase == LifecyclePhase::Launching {
            self.phase = LifecyclePhase::Running;
        }
        if self.table.all_exited() {
            self.phase = LifecyclePhase::Exited;
            return CoreStep::stop_with(Vec::new());
        }
        CoreStep::continue_with(Vec::new())
    }

    /// Handle a single event.
    pub fn step(&mut self, event: SupervisorEvent) -> CoreStep {
        match event {
            SupervisorEvent::ChildExited { slot, code } => {
                handle_child_exit(&self.table, &mut self.phase, slot, code)
            }
            SupervisorEvent::ShutdownRequested(signal) => {
                handle_shutdown(&self.table, &mut self.phase, signal)
            }
            SupervisorEvent::GraceElapsed => handle_grace_elapsed(&self.table, &mut self.phase),
        }
    }

    /// Enter `Exited` and return the aggregated exit code.
    pub fn finish(&mut self) -> i32 {
        self.phase = LifecyclePhase::Exited;
        self.table.aggregate_exit_code()
    }
}

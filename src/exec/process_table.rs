// src/exec/process_table.rs

//! Shared table of managed child processes.
//!
//! The launcher registers entries and records pids; the supervisor marks
//! exits and reads pids when it has to signal. Slots are positions in
//! spawn order and never move.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::manifest::ManifestEntry;
use crate::types::ProcessState;

/// Slot of a process in the [`ProcessTable`].
pub type Slot = usize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagedProcess {
    pub entry: ManifestEntry,
    pub pid: Option<u32>,
    pub exit_code: Option<i32>,
    pub state: ProcessState,
}

#[derive(Debug, Clone, Default)]
pub struct ProcessTable {
    inner: Arc<Mutex<Vec<ManagedProcess>>>,
}

impl ProcessTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<ManagedProcess>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add an entry in the `Starting` state and return its slot.
    pub fn register(&self, entry: ManifestEntry) -> Slot {
        let mut table = self.lock();
        table.push(ManagedProcess {
            entry,
            pid: None,
            exit_code: None,
            state: ProcessState::Starting,
        });
        table.len() - 1
    }

    pub fn mark_running(&self, slot: Slot, pid: Option<u32>) {
        if let Some(process) = self.lock().get_mut(slot) {
            process.pid = pid;
            process.state = ProcessState::Running;
        }
    }

    /// Record an exit. Returns `false` if the slot is unknown or had
    /// already exited (the first recorded code wins).
    pub fn mark_exited(&self, slot: Slot, code: i32) -> bool {
        match self.lock().get_mut(slot) {
            Some(process) if process.state != ProcessState::Exited => {
                process.exit_code = Some(code);
                process.state = ProcessState::Exited;
                true
            }
            _ => false,
        }
    }

    /// Pids of processes that were spawned and have not exited yet.
    pub fn live_pids(&self) -> Vec<u32> {
        self.lock()
            .iter()
            .filter(|p| p.state == ProcessState::Running)
            .filter_map(|p| p.pid)
            .collect()
    }

    pub fn all_exited(&self) -> bool {
        self.lock().iter().all(|p| p.state == ProcessState::Exited)
    }

    pub fn snapshot(&self) -> Vec<ManagedProcess> {
        self.lock().clone()
    }

    pub fn get(&self, slot: Slot) -> Option<ManagedProcess> {
        self.lock().get(slot).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// First non-zero exit code in spawn order, else 0.
    pub fn aggregate_exit_code(&self) -> i32 {
        aggregate_exit_code(self.lock().iter().map(|p| p.exit_code))
    }
}

/// First non-zero code in iteration order; `None` (still running) is
/// skipped. Returns 0 when there is none.
pub fn aggregate_exit_code<I>(codes: I) -> i32
where
    I: IntoIterator<Item = Option<i32>>,
{
    codes
        .into_iter()
        .flatten()
        .find(|code| *code != 0)
        .unwrap_or(0)
}

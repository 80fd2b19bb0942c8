// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`launcher`] spawns manifest entries through the shell and wires their
//!   output into per-child multiplexers.
//! - [`process_table`] is the shared, mutex-protected record of every
//!   managed process.
//! - [`signal`] wraps liveness checks and process-group signalling.

pub mod launcher;
pub mod process_table;
pub mod signal;

pub use launcher::{Launched, Launcher, SPAWN_FAILURE_EXIT_CODE, exit_code_of, shell_command};
pub use process_table::{ManagedProcess, ProcessTable, Slot, aggregate_exit_code};

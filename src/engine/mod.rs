// src/engine/mod.rs

//! Lifecycle engine for procmux.
//!
//! This module ties together:
//! - the single-instance guard and log rotation at startup
//! - launching the manifest
//! - the supervising event loop that reacts to:
//!   - child exits
//!   - shutdown signals
//!   - the termination grace period running out
//!
//! The synchronous state machine lives in [`core`]; the async/IO shell is
//! implemented in [`runtime`], and [`lifecycle`] drives a whole run.

use std::fmt;

use crate::exec::Slot;

/// Phases of a supervisor run, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecyclePhase {
    Idle,
    Guarded,
    LogsRotated,
    EnvLoaded,
    Launching,
    Running,
    Terminating,
    Exited,
}

/// Which signal asked the supervisor to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownSignal {
    Interrupt,
    Terminate,
}

impl fmt::Display for ShutdownSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShutdownSignal::Interrupt => f.write_str("SIGINT"),
            ShutdownSignal::Terminate => f.write_str("SIGTERM"),
        }
    }
}

/// Events flowing into the supervisor from waiters, signal listeners and
/// timers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SupervisorEvent {
    /// A child was reaped (or failed to spawn) with this exit code.
    ChildExited { slot: Slot, code: i32 },
    /// An interrupt/terminate signal arrived.
    ShutdownRequested(ShutdownSignal),
    /// The termination grace period ran out.
    GraceElapsed,
}

pub mod core;
pub mod event_handlers;
pub mod lifecycle;
pub mod runtime;
pub mod signals;

pub use self::core::SupervisorCore;
pub use event_handlers::{CoreCommand, CoreStep};
pub use lifecycle::Lifecycle;
pub use runtime::Supervisor;
pub use signals::install_signal_listener;

// src/mux/console.rs

//! Terminal side of the multiplexer.
//!
//! Multiplexers talk to a `Console` instead of `stdout` directly, so tests
//! can capture the terminal copy (and pretend to be a TTY) without
//! touching the real standard output.

use std::fmt::Debug;
use std::io::{IsTerminal, Write};
use std::sync::{Arc, Mutex, PoisonError};

pub trait Console: Send + Sync + Debug {
    /// Write one already formatted line.
    fn write_line(&self, line: &str);

    /// Whether output lands on an interactive terminal.
    fn is_terminal(&self) -> bool;
}

/// The process's standard output.
#[derive(Debug, Clone, Default)]
pub struct StdoutConsole;

impl Console for StdoutConsole {
    fn write_line(&self, line: &str) {
        let mut out = std::io::stdout().lock();
        // stdout may be closed (e.g. piped into `head`).
        let _ = writeln!(out, "{line}");
    }

    fn is_terminal(&self) -> bool {
        std::io::stdout().is_terminal()
    }
}

/// In-memory console that records every line.
#[derive(Debug, Clone, Default)]
pub struct MemoryConsole {
    lines: Arc<Mutex<Vec<String>>>,
    terminal: bool,
}

impl MemoryConsole {
    pub fn new() -> Self {
        Self::default()
    }

    /// A memory console that reports itself as a terminal.
    pub fn terminal() -> Self {
        Self {
            lines: Arc::default(),
            terminal: true,
        }
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Console for MemoryConsole {
    fn write_line(&self, line: &str) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line.to_string());
    }

    fn is_terminal(&self) -> bool {
        self.terminal
    }
}

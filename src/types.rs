// src/types.rs

use std::fmt;
use std::str::FromStr;

/// Whether the terminal copy of the multiplexed output is colorized.
///
/// - `Auto`: color only when stdout is an interactive terminal (default).
/// - `Always` / `Never`: force colors on or off regardless of detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// Resolve the mode against the terminal detection result.
    pub fn enabled(self, is_terminal: bool) -> bool {
        match self {
            ColorMode::Auto => is_terminal,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

impl FromStr for ColorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" | "" => Ok(ColorMode::Auto),
            "always" | "on" | "true" | "yes" | "1" => Ok(ColorMode::Always),
            "never" | "off" | "false" | "no" | "0" => Ok(ColorMode::Never),
            other => Err(format!(
                "invalid color mode: {other} (expected \"auto\", \"always\" or \"never\")"
            )),
        }
    }
}

/// Lifecycle of a single managed child process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    /// Registered in the process table, spawn not attempted yet.
    Starting,
    /// Spawned and not yet reaped.
    Running,
    /// Exited on its own, was killed, or failed to spawn.
    Exited,
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProcessState::Starting => "starting",
            ProcessState::Running => "running",
            ProcessState::Exited => "exited",
        };
        f.write_str(s)
    }
}

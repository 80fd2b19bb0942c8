// src/errors.rs

//! Crate-wide error type and helpers.
//!
//! Every variant here is a *fatal startup* error: it aborts the run before
//! any child is spawned. Per-child failures never surface as errors; they
//! show up as log lines and in the aggregated exit code instead.

use std::path::PathBuf;

use thiserror::Error;

/// Exit status used for fatal startup errors (missing manifest, guard held
/// by a live instance, ...). Distinct from the usual child exit codes.
pub const FATAL_EXIT_CODE: i32 = 125;

#[derive(Error, Debug)]
pub enum ProcmuxError {
    #[error("manifest not found: {}", .0.display())]
    ManifestNotFound(PathBuf),

    #[error("failed to read manifest {}: {source}", .path.display())]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("manifest line {line}: {message}")]
    ManifestSyntax { line: usize, message: String },

    #[error("already running with pid {pid} (guard file {})", .path.display())]
    AlreadyRunning { pid: u32, path: PathBuf },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ProcmuxError {
    /// Process exit status to use when this error aborts the supervisor.
    pub fn exit_code(&self) -> i32 {
        FATAL_EXIT_CODE
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, ProcmuxError>;

// src/config/paths.rs

use std::path::{Path, PathBuf};

pub const DEFAULT_MANIFEST: &str = "Procfile";
pub const DEFAULT_ENV_FILE: &str = ".env";
pub const ACTIVE_LOG_NAME: &str = "procmux.log";
pub const PREVIOUS_LOG_NAME: &str = "procmux.prev.log";
pub const GUARD_FILE_NAME: &str = "procmux.pid";

/// Every file a single run reads or writes.
///
/// The manifest and env file are taken as given (relative paths resolve
/// against the process cwd); the log and guard files always live in the
/// working directory the supervisor is guarding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPaths {
    pub manifest: PathBuf,
    pub env_file: PathBuf,
    pub active_log: PathBuf,
    pub previous_log: PathBuf,
    pub guard: PathBuf,
}

impl RunPaths {
    pub fn new(work_dir: &Path, manifest: impl Into<PathBuf>, env_file: impl Into<PathBuf>) -> Self {
        Self {
            manifest: manifest.into(),
            env_file: env_file.into(),
            active_log: work_dir.join(ACTIVE_LOG_NAME),
            previous_log: work_dir.join(PREVIOUS_LOG_NAME),
            guard: work_dir.join(GUARD_FILE_NAME),
        }
    }

    /// Default manifest and env file names inside `work_dir`.
    pub fn with_defaults(work_dir: &Path) -> Self {
        Self::new(
            work_dir,
            work_dir.join(DEFAULT_MANIFEST),
            work_dir.join(DEFAULT_ENV_FILE),
        )
    }
}

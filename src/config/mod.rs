// src/config/mod.rs

//! Supervisor configuration: file locations and env-driven settings.

pub mod paths;
pub mod settings;

pub use paths::{
    ACTIVE_LOG_NAME, DEFAULT_ENV_FILE, DEFAULT_MANIFEST, GUARD_FILE_NAME, PREVIOUS_LOG_NAME,
    RunPaths,
};
pub use settings::{
    COLOR_VAR, DEFAULT_GRACE_PERIOD, DEFAULT_MAX_LINE_LEN, GRACE_VAR, LOG_VAR, MAX_LINE_VAR,
    Settings,
};

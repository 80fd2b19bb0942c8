// src/config/settings.rs

//! Runtime knobs resolved from environment variables.
//!
//! Each variable is looked up in the env-file overrides first and then in
//! the supervisor's own environment, so a `.env` file can tune the
//! supervisor exactly like it tunes the children. Invalid values fall back
//! to the default with a warning instead of aborting the run.

use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::env_file::EnvOverrides;
use crate::types::ColorMode;

/// Maximum length (in bytes) of a multiplexed message before truncation.
pub const MAX_LINE_VAR: &str = "PROCMUX_MAX_LINE";
/// Forces terminal colors on or off (`always`, `never`, `auto`).
pub const COLOR_VAR: &str = "PROCMUX_COLOR";
/// Grace period in milliseconds between SIGTERM and SIGKILL on shutdown.
pub const GRACE_VAR: &str = "PROCMUX_GRACE_MS";
/// Diagnostic log level when `--log-level` is not given.
pub const LOG_VAR: &str = "PROCMUX_LOG";

pub const DEFAULT_MAX_LINE_LEN: usize = 500;
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub max_line_len: usize,
    pub color: ColorMode,
    pub grace_period: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_line_len: DEFAULT_MAX_LINE_LEN,
            color: ColorMode::Auto,
            grace_period: DEFAULT_GRACE_PERIOD,
        }
    }
}

impl Settings {
    /// Resolve settings from the env-file overlay, then the process env.
    pub fn from_env(overrides: &EnvOverrides) -> Self {
        Self::from_lookup(|key| {
            overrides
                .get(key)
                .map(str::to_string)
                .or_else(|| std::env::var(key).ok())
        })
    }

    /// Resolve settings through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let max_line_len = parse_var::<usize, _>(&lookup, MAX_LINE_VAR)
            .filter(|len| *len > 0)
            .unwrap_or(defaults.max_line_len);

        let color = parse_var::<ColorMode, _>(&lookup, COLOR_VAR).unwrap_or(defaults.color);

        let grace_period = parse_var::<u64, _>(&lookup, GRACE_VAR)
            .map(Duration::from_millis)
            .unwrap_or(defaults.grace_period);

        Self {
            max_line_len,
            color,
            grace_period,
        }
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(var = key, value = %raw, error = %e, "ignoring invalid setting; using default");
            None
        }
    }
}

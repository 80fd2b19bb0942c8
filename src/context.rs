// src/context.rs

use std::sync::Arc;

use crate::config::Settings;
use crate::env_file::EnvOverrides;
use crate::mux::{Console, LogSink};

/// Everything a run shares across components.
///
/// Built once after the guard is held and the logs are rotated, then
/// handed (behind an `Arc`) to the launcher and every multiplexer.
#[derive(Debug)]
pub struct SupervisorContext {
    pub settings: Settings,
    pub env: EnvOverrides,
    pub sink: Arc<LogSink>,
    pub console: Arc<dyn Console>,
}

impl SupervisorContext {
    pub fn new(
        settings: Settings,
        env: EnvOverrides,
        sink: Arc<LogSink>,
        console: Arc<dyn Console>,
    ) -> Self {
        Self {
            settings,
            env,
            sink,
            console,
        }
    }

    /// Whether the terminal copy should carry ANSI colors.
    pub fn color_enabled(&self) -> bool {
        self.settings.color.enabled(self.console.is_terminal())
    }
}

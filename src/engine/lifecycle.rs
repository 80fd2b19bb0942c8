// src/engine/lifecycle.rs

//! One complete supervisor run.
//!
//! `Idle → Guarded → LogsRotated → EnvLoaded → Launching → Running →
//! (Terminating →) Exited`. The guard is released on every path out of
//! [`Lifecycle::run`], including fatal errors after it was taken.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::config::{RunPaths, Settings};
use crate::context::SupervisorContext;
use crate::env_file::load_env_file;
use crate::errors::Result;
use crate::guard::RunGuard;
use crate::manifest::Manifest;
use crate::mux::{Console, LogSink};

use super::runtime::Supervisor;
use super::{LifecyclePhase, ShutdownSignal};

#[derive(Debug)]
pub struct Lifecycle {
    paths: RunPaths,
    console: Arc<dyn Console>,
    phase: LifecyclePhase,
}

impl Lifecycle {
    pub fn new(paths: RunPaths, console: Arc<dyn Console>) -> Self {
        Self {
            paths,
            console,
            phase: LifecyclePhase::Idle,
        }
    }

    pub fn phase(&self) -> LifecyclePhase {
        self.phase
    }

    /// Run the manifest to completion. `signals` carries shutdown requests
    /// (OS signals in production, injected ones in tests).
    ///
    /// Returns the aggregated child exit code, or a fatal startup error.
    pub async fn run(mut self, signals: mpsc::UnboundedReceiver<ShutdownSignal>) -> Result<i32> {
        let guard = RunGuard::acquire(&self.paths.guard)?;
        self.advance(LifecyclePhase::Guarded);

        let result = self.run_guarded(signals).await;

        if let Err(e) = guard.release() {
            warn!(path = %self.paths.guard.display(), error = %e, "failed to remove guard file");
        }
        self.advance(LifecyclePhase::Exited);

        result
    }

    async fn run_guarded(
        &mut self,
        signals: mpsc::UnboundedReceiver<ShutdownSignal>,
    ) -> Result<i32> {
        let sink = Arc::new(LogSink::rotate(
            &self.paths.active_log,
            &self.paths.previous_log,
        )?);
        self.advance(LifecyclePhase::LogsRotated);

        let env = load_env_file(&self.paths.env_file)?;
        let settings = Settings::from_env(&env);
        self.advance(LifecyclePhase::EnvLoaded);

        let manifest = Manifest::load(&self.paths.manifest)?;

        let ctx = Arc::new(SupervisorContext::new(
            settings,
            env,
            sink,
            Arc::clone(&self.console),
        ));
        let mut supervisor = Supervisor::new(ctx);
        supervisor.forward_signals(signals);

        self.advance(LifecyclePhase::Launching);
        supervisor.launch(manifest);

        self.advance(LifecyclePhase::Running);
        Ok(supervisor.run().await)
    }

    fn advance(&mut self, next: LifecyclePhase) {
        debug!(from = ?self.phase, to = ?next, "lifecycle transition");
        self.phase = next;
    }
}

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use procmux::config::{RunPaths, Settings};
use procmux::context::SupervisorContext;
use procmux::env_file::EnvOverrides;
use procmux::mux::{LogSink, MemoryConsole};
use tempfile::TempDir;

/// Builder for manifest text to simplify test setup.
#[derive(Debug, Default, Clone)]
pub struct ManifestBuilder {
    lines: Vec<String>,
}

impl ManifestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn process(mut self, name: &str, command: &str) -> Self {
        self.lines.push(format!("{name}: {command}"));
        self
    }

    pub fn comment(mut self, text: &str) -> Self {
        self.lines.push(format!("# {text}"));
        self
    }

    pub fn blank(mut self) -> Self {
        self.lines.push(String::new());
        self
    }

    pub fn raw(mut self, line: &str) -> Self {
        self.lines.push(line.to_string());
        self
    }

    pub fn build(&self) -> String {
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }
}

/// A throwaway working directory holding the manifest, env file, logs and
/// guard file of one test.
#[derive(Debug)]
pub struct TestWorkspace {
    dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("creating temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn paths(&self) -> RunPaths {
        RunPaths::with_defaults(self.dir.path())
    }

    pub fn join(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn write_manifest(&self, manifest: &ManifestBuilder) -> &Self {
        fs::write(self.paths().manifest, manifest.build()).expect("writing manifest");
        self
    }

    pub fn write_env(&self, contents: &str) -> &Self {
        fs::write(self.paths().env_file, contents).expect("writing env file");
        self
    }

    pub fn read_log(&self) -> String {
        fs::read_to_string(self.paths().active_log).unwrap_or_default()
    }

    pub fn read_previous_log(&self) -> Option<String> {
        fs::read_to_string(self.paths().previous_log).ok()
    }

    pub fn guard_exists(&self) -> bool {
        self.paths().guard.exists()
    }

    /// A context logging into this workspace's active log.
    pub fn context(&self, settings: Settings, console: MemoryConsole) -> Arc<SupervisorContext> {
        let paths = self.paths();
        let sink = LogSink::rotate(&paths.active_log, &paths.previous_log).expect("opening sink");
        Arc::new(SupervisorContext::new(
            settings,
            EnvOverrides::new(),
            Arc::new(sink),
            Arc::new(console),
        ))
    }
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

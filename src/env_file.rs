// src/env_file.rs

//! `.env` loading.
//!
//! The file is a plain list of `KEY=VALUE` lines. Parsing is tolerant:
//! comments, blank lines and anything that doesn't look like an assignment
//! are skipped. The resulting overrides are applied to every child's
//! `Command` rather than to the supervisor's own process environment.

use std::io::ErrorKind;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::errors::Result;

static ASSIGNMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:export\s+)?([A-Za-z_][A-Za-z0-9_]*)=(.*)$")
        .expect("env assignment pattern is valid")
});

/// Ordered set of environment overrides. A later assignment to the same
/// key replaces the earlier value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    vars: Vec<(String, String)>,
}

impl EnvOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.vars.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.vars.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

/// Parse env file contents. Never fails; malformed lines, including lines
/// that aren't valid UTF-8, are ignored.
pub fn parse_env(contents: impl AsRef<[u8]>) -> EnvOverrides {
    let mut overrides = EnvOverrides::new();
    for (idx, raw) in contents.as_ref().split(|b| *b == b'\n').enumerate() {
        let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
        let Ok(line) = std::str::from_utf8(raw) else {
            debug!(line = idx + 1, "skipping env line that is not valid UTF-8");
            continue;
        };
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        match ASSIGNMENT.captures(line) {
            Some(caps) => {
                let value = unquote(caps[2].trim());
                overrides.insert(&caps[1], value);
            }
            None => debug!(line = idx + 1, "skipping malformed env line"),
        }
    }
    overrides
}

/// Load the env file at `path`. A missing file yields no overrides.
pub fn load_env_file(path: &Path) -> Result<EnvOverrides> {
    let contents = match std::fs::read(path) {
        Ok(c) => c,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "no env file; continuing without overrides");
            return Ok(EnvOverrides::new());
        }
        Err(e) => return Err(e.into()),
    };

    let overrides = parse_env(&contents);
    debug!(path = %path.display(), count = overrides.len(), "loaded env file");
    Ok(overrides)
}

fn unquote(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'"' || first == b'\'') {
            return &value[1..value.len() - 1];
        }
    }
    value
}

// src/manifest/mod.rs

//! Process manifest (`Procfile`-style) model and loading.
//!
//! A manifest is an ordered list of `name: command` lines. Each accepted
//! line becomes a [`ManifestEntry`] with a 1-based `index` in document
//! order; the index drives color selection in the multiplexer.

pub mod parser;

use std::io::ErrorKind;
use std::path::Path;

use crate::errors::{ProcmuxError, Result};
use crate::mux::format::{ansi_color_code, palette_slot};

pub use parser::{ManifestLines, entries};

/// One `name: command` line of the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// 1-based position among accepted entries.
    pub index: usize,
    pub name: String,
    pub command: String,
}

impl ManifestEntry {
    /// Palette slot in `1..=7`.
    pub fn palette_slot(&self) -> usize {
        palette_slot(self.index)
    }

    /// ANSI SGR foreground code used on the terminal copy.
    pub fn ansi_color(&self) -> u8 {
        ansi_color_code(self.index)
    }
}

/// A fully validated manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    entries: Vec<ManifestEntry>,
}

impl Manifest {
    /// Parse manifest contents, failing on the first malformed line.
    pub fn parse(contents: &str) -> Result<Self> {
        let entries = parser::entries(contents).collect::<Result<Vec<_>>>()?;
        Ok(Self { entries })
    }

    /// Read and parse the manifest at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                ProcmuxError::ManifestNotFound(path.to_path_buf())
            } else {
                ProcmuxError::ManifestRead {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        Self::parse(&contents)
    }

    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ManifestEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for Manifest {
    type Item = ManifestEntry;
    type IntoIter = std::vec::IntoIter<ManifestEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Manifest {
    type Item = &'a ManifestEntry;
    type IntoIter = std::slice::Iter<'a, ManifestEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

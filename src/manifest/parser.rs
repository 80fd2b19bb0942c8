// src/manifest/parser.rs

//! Line-level manifest parsing.
//!
//! Rules per physical line:
//! - empty / whitespace-only lines are skipped
//! - lines whose first non-space character is `#` are skipped
//! - everything else is split at the first `:`; the left side (trimmed) is
//!   the name, the right side minus exactly one leading space is the command

use std::iter::Enumerate;
use std::str::Lines;

use crate::errors::{ProcmuxError, Result};

use super::ManifestEntry;

/// Lazy iterator over the entries of a manifest.
///
/// Yields `Err` for a malformed line; callers that want all-or-nothing
/// semantics collect into `Result<Vec<_>>`.
#[derive(Debug)]
pub struct ManifestLines<'a> {
    lines: Enumerate<Lines<'a>>,
    next_index: usize,
}

/// Iterate the entries of `contents` in document order.
pub fn entries(contents: &str) -> ManifestLines<'_> {
    ManifestLines {
        lines: contents.lines().enumerate(),
        next_index: 1,
    }
}

impl Iterator for ManifestLines<'_> {
    type Item = Result<ManifestEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        for (line_idx, line) in self.lines.by_ref() {
            if is_ignored(line) {
                continue;
            }

            let entry = parse_line(line, line_idx + 1).map(|(name, command)| ManifestEntry {
                index: self.next_index,
                name,
                command,
            });
            if entry.is_ok() {
                self.next_index += 1;
            }
            return Some(entry);
        }
        None
    }
}

fn is_ignored(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.is_empty() || trimmed.starts_with('#')
}

fn parse_line(line: &str, line_no: usize) -> Result<(String, String)> {
    let Some((name, rest)) = line.split_once(':') else {
        return Err(ProcmuxError::ManifestSyntax {
            line: line_no,
            message: "expected `<name>: <command>`".to_string(),
        });
    };

    let name = name.trim();
    if name.is_empty() {
        return Err(ProcmuxError::ManifestSyntax {
            line: line_no,
            message: "process name is empty".to_string(),
        });
    }

    let command = rest.strip_prefix(' ').unwrap_or(rest);
    Ok((name.to_string(), command.to_string()))
}

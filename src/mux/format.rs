// src/mux/format.rs

//! Pure formatting helpers for multiplexed lines.

use std::borrow::Cow;

use chrono::Local;

/// Number of colors in the rotating palette.
pub const PALETTE_SIZE: usize = 7;
/// Marker appended to truncated messages.
pub const ELLIPSIS: &str = "...";

const RESET: &str = "\x1b[0m";

/// 1-based palette slot for a 1-based manifest index.
pub fn palette_slot(index: usize) -> usize {
    1 + (index.saturating_sub(1) % PALETTE_SIZE)
}

/// ANSI foreground code (`31..=37`) for a manifest index.
pub fn ansi_color_code(index: usize) -> u8 {
    31 + (index % PALETTE_SIZE) as u8
}

/// Wall-clock `HH:MM:SS` in local time.
pub fn timestamp_now() -> String {
    Local::now().format("%H:%M:%S").to_string()
}

/// Cut a raw output line to at most `max_len` bytes, appending [`ELLIPSIS`]
/// when anything was dropped, and decode it for display.
///
/// The cut is on raw length: a multi-byte sequence split at the limit is
/// not completed and decodes as U+FFFD, like any other invalid input.
pub fn truncate_line(raw: &[u8], max_len: usize) -> Cow<'_, str> {
    if raw.len() <= max_len {
        return String::from_utf8_lossy(raw);
    }
    let mut cut = String::from_utf8_lossy(&raw[..max_len]).into_owned();
    cut.push_str(ELLIPSIS);
    Cow::Owned(cut)
}

/// Plain `<timestamp> <name>\t| <message>` line, as written to the log file.
pub fn format_line(timestamp: &str, name: &str, message: &str) -> String {
    format!("{timestamp} {name}\t| {message}")
}

/// Terminal rendering: same text as [`format_line`], with the prefix
/// wrapped in the given ANSI color when one is supplied.
pub fn render_terminal(timestamp: &str, name: &str, message: &str, color: Option<u8>) -> String {
    match color {
        Some(code) => format!("\x1b[{code}m{timestamp} {name}\t|{RESET} {message}"),
        None => format_line(timestamp, name, message),
    }
}

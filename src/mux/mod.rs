// src/mux/mod.rs

//! Log multiplexing.
//!
//! - [`format`] holds the pure line formatting rules (timestamp, palette,
//!   truncation).
//! - [`sink`] owns the durable log file and its rotation.
//! - [`console`] abstracts the terminal copy.
//! - [`multiplexer`] ties them together per child process.

pub mod console;
pub mod format;
pub mod multiplexer;
pub mod sink;

pub use console::{Console, MemoryConsole, StdoutConsole};
pub use multiplexer::{Multiplexer, spawn_line_reader};
pub use sink::LogSink;

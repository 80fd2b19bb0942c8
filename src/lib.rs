// src/lib.rs

pub mod cli;
pub mod config;
pub mod context;
pub mod engine;
pub mod env_file;
pub mod errors;
pub mod exec;
pub mod guard;
pub mod logging;
pub mod manifest;
pub mod mux;
pub mod types;

use std::sync::Arc;

use tracing::debug;

use crate::cli::CliArgs;
use crate::config::{RunPaths, Settings};
use crate::engine::{Lifecycle, install_signal_listener};
use crate::env_file::{EnvOverrides, load_env_file};
use crate::errors::Result;
use crate::manifest::Manifest;
use crate::mux::StdoutConsole;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - guard file and log rotation in the current directory
/// - env file + manifest loading
/// - launching every entry with its own multiplexer
/// - SIGINT/SIGTERM handling
///
/// Returns the exit status the process should end with.
pub async fn run(args: CliArgs) -> Result<i32> {
    let work_dir = std::env::current_dir()?;
    let paths = RunPaths::new(&work_dir, args.manifest, args.env_file);

    if args.dry_run {
        let manifest = Manifest::load(&paths.manifest)?;
        let env = load_env_file(&paths.env_file)?;
        print_dry_run(&paths, &manifest, &env);
        return Ok(0);
    }

    let signals = install_signal_listener()?;
    Lifecycle::new(paths, Arc::new(StdoutConsole))
        .run(signals)
        .await
}

/// Simple dry-run output: print entries, palette slots and commands.
fn print_dry_run(paths: &RunPaths, manifest: &Manifest, env: &EnvOverrides) {
    let settings = Settings::from_env(env);

    println!("procmux dry-run");
    println!("  manifest = {}", paths.manifest.display());
    println!(
        "  env_file = {} ({} overrides)",
        paths.env_file.display(),
        env.len()
    );
    println!("  max_line_len = {}", settings.max_line_len);
    println!("  color = {:?}", settings.color);
    println!("  grace_period = {:?}", settings.grace_period);
    println!();

    println!("processes ({}):", manifest.len());
    for entry in manifest {
        println!(
            "  {}. {} (color {})",
            entry.index,
            entry.name,
            entry.palette_slot()
        );
        println!("      cmd: {}", entry.command);
    }

    debug!("dry-run complete (no execution)");
}

// src/engine/signals.rs

//! OS signal interception.
//!
//! Handlers are registered synchronously when the listener is installed,
//! so no signal is lost between installation and the first poll. Each
//! received signal becomes a [`ShutdownSignal`] on the returned channel.

use tokio::sync::mpsc;
use tracing::debug;

use super::ShutdownSignal;

/// Register SIGINT/SIGTERM handlers and stream them as [`ShutdownSignal`]s.
#[cfg(unix)]
pub fn install_signal_listener() -> std::io::Result<mpsc::UnboundedReceiver<ShutdownSignal>> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        loop {
            let received = tokio::select! {
                s = sigint.recv() => s.map(|()| ShutdownSignal::Interrupt),
                s = sigterm.recv() => s.map(|()| ShutdownSignal::Terminate),
            };
            let Some(signal) = received else { break };

            debug!(%signal, "signal received");
            if tx.send(signal).is_err() {
                break;
            }
        }
    });

    Ok(rx)
}

#[cfg(not(unix))]
pub fn install_signal_listener() -> std::io::Result<mpsc::UnboundedReceiver<ShutdownSignal>> {
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            debug!("Ctrl+C received");
            if tx.send(ShutdownSignal::Interrupt).is_err() {
                break;
            }
        }
    });

    Ok(rx)
}

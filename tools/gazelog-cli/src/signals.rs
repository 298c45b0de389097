//! Termination signals published as a shutdown flag.

use tokio::sync::watch;

/// Start listening for SIGINT, SIGTERM and SIGHUP. The returned receiver
/// flips to `true` on the first one. Handlers stay installed afterwards,
/// so later signals no longer terminate the process while it finalizes.
pub fn spawn_listener() -> watch::Receiver<bool> {
    let (tx, rx) = watch::channel(false);
    tokio::spawn(async move {
        match wait_for_signal().await {
            Ok(name) => {
                println!();
                println!("Caught {name}. Cleaning up...");
                tracing::info!(signal = name, "Shutdown requested");
                let _ = tx.send(true);
            }
            Err(e) => tracing::warn!(error = %e, "Failed to install signal handlers"),
        }
    });
    rx
}

#[cfg(unix)]
async fn wait_for_signal() -> std::io::Result<&'static str> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = signal(SignalKind::terminate())?;
    let mut hangup = signal(SignalKind::hangup())?;
    tokio::select! {
        result = tokio::signal::ctrl_c() => result.map(|_| "SIGINT (Ctrl-C)"),
        _ = terminate.recv() => Ok("SIGTERM"),
        _ = hangup.recv() => Ok("SIGHUP (terminal closed)"),
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() -> std::io::Result<&'static str> {
    tokio::signal::ctrl_c().await.map(|_| "Ctrl-C")
}

//! Cross-platform shutdown-signal waiting.
//!
//! [`wait_for_shutdown_signal`] completes when the process receives a
//! termination signal. The caller cancels the session token in response; an
//! interrupt is a clean abort, not an error.
//!
//! ## Unix
//! Handles **SIGINT** (Ctrl-C) and **SIGTERM** (default kill signal), with
//! [`tokio::signal::ctrl_c`] awaited as a fallback.
//!
//! ## Windows
//! Only [`tokio::signal::ctrl_c`] is awaited.

#[cfg(unix)]
pub async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {},
        _ = sigint.recv()  => {},
        _ = sigterm.recv() => {},
    }
    Ok(())
}

#[cfg(not(unix))]
pub async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}

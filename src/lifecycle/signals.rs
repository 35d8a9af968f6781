//! OS signal handling.
//!
//! SIGINT (Ctrl+C) and SIGTERM both mean "shut down". Only the first one is
//! acted on; a second signal during the drain changes nothing.

/// Wait for the first termination signal and return its name.
pub async fn termination() -> std::io::Result<&'static str> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut terminate = signal(SignalKind::terminate())?;
        tokio::select! {
            result = tokio::signal::ctrl_c() => result.map(|_| "SIGINT"),
            _ = terminate.recv() => Ok("SIGTERM"),
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await.map(|_| "ctrl-c")
    }
}

/// [`termination`], with the outcome logged. Resolves immediately when the
/// handlers cannot be installed.
pub async fn shutdown_signal() {
    match termination().await {
        Ok(name) => tracing::info!(signal = name, "Shutdown signal received"),
        Err(e) => tracing::error!(error = %e, "Failed to install signal handlers"),
    }
}

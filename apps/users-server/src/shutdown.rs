use anyhow::Result;

/// Resolves on SIGTERM or Ctrl+C.
pub async fn wait_for_shutdown() -> Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sigint = signal(SignalKind::interrupt())?;
        tokio::select! {
            _ = sigterm.recv() => {},
            _ = sigint.recv()  => {},
            _ = tokio::signal::ctrl_c() => {},
        }
        Ok(())
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
        Ok(())
    }
}

/// Future for `with_graceful_shutdown`; a failed signal hookup is logged
/// and treated as an immediate stop request.
pub async fn signal() {
    match wait_for_shutdown().await {
        Ok(()) => tracing::info!("shutdown: signal received, draining connections"),
        Err(e) => tracing::error!(error = %e, "shutdown: failed to install signal handlers"),
    }
}

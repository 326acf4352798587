//! OS signal handling for graceful shutdown.

use anyhow::Result;

/// Resolves once the process receives a termination request.
///
/// Unix: SIGTERM or SIGINT. Windows: any console control event.
pub async fn wait_for_shutdown() -> Result<()> {
    let signal = wait_for_signal().await?;
    tracing::info!(signal, "shutdown requested");
    Ok(())
}

#[cfg(unix)]
async fn wait_for_signal() -> Result<&'static str> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;
    let name = tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    };
    Ok(name)
}

#[cfg(windows)]
async fn wait_for_signal() -> Result<&'static str> {
    use tokio::signal::windows::{ctrl_break, ctrl_c, ctrl_close, ctrl_shutdown};

    let mut c = ctrl_c()?;
    let mut br = ctrl_break()?;
    let mut cl = ctrl_close()?;
    let mut sh = ctrl_shutdown()?;
    let name = tokio::select! {
        _ = c.recv() => "CTRL_C",
        _ = br.recv() => "CTRL_BREAK",
        _ = cl.recv() => "CTRL_CLOSE",
        _ = sh.recv() => "CTRL_SHUTDOWN",
    };
    Ok(name)
}

use super::ShutdownReason;
use crate::context::Context;
use crate::error::Result;
use crate::logging::Logger;
use tokio::signal;
use tracing::info;

/// Wait for SIGINT or SIGTERM, or for `ctx` to end
pub async fn wait_for_shutdown(ctx: &Context, logger: &Logger) -> Result<ShutdownReason> {
    tokio::select! {
        result = signal::ctrl_c() => {
            result?;
            info!(parent: logger.span(), "Received SIGINT signal (Ctrl+C)");
            Ok(ShutdownReason::Signal("SIGINT".to_string()))
        }
        result = terminate() => {
            result?;
            info!(parent: logger.span(), "Received SIGTERM signal");
            Ok(ShutdownReason::Signal("SIGTERM".to_string()))
        }
        _ = ctx.done() => {
            info!(parent: logger.span(), "Shutdown requested");
            Ok(ShutdownReason::UserRequest)
        }
    }
}

#[cfg(unix)]
async fn terminate() -> Result<()> {
    let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())?;
    sigterm.recv().await;
    Ok(())
}

#[cfg(not(unix))]
async fn terminate() -> Result<()> {
    std::future::pending().await
}

//! Graceful shutdown on Ctrl+C or SIGTERM.

use std::{fmt, io, time::Duration};

use salvo::server::ServerHandle;
use thiserror::Error;
use tokio::signal;
use tracing::info;

/// In-flight requests get this long to finish once a signal arrives.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub(crate) enum ShutdownSignalError {
    #[error("failed to install Ctrl+C handler: {0}")]
    CtrlC(#[source] io::Error),

    #[cfg(unix)]
    #[error("failed to install SIGTERM handler: {0}")]
    SigTerm(#[source] io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShutdownSignal {
    CtrlC,
    Terminate,
}

impl fmt::Display for ShutdownSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::CtrlC => "ctrl_c",
            Self::Terminate => "terminate",
        })
    }
}

/// Wait for a shutdown signal, then stop accepting connections and drain.
pub(crate) async fn listen(handle: ServerHandle) -> Result<(), ShutdownSignalError> {
    let received = wait_for_signal().await?;

    info!(signal = %received, drain_secs = DRAIN_TIMEOUT.as_secs(), "shutting down");

    handle.stop_graceful(Some(DRAIN_TIMEOUT));

    Ok(())
}

async fn wait_for_signal() -> Result<ShutdownSignal, ShutdownSignalError> {
    let ctrl_c = async {
        signal::ctrl_c().await.map_err(ShutdownSignalError::CtrlC)?;

        Ok::<_, ShutdownSignalError>(ShutdownSignal::CtrlC)
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .map_err(ShutdownSignalError::SigTerm)?
            .recv()
            .await;

        Ok::<_, ShutdownSignalError>(ShutdownSignal::Terminate)
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<Result<ShutdownSignal, ShutdownSignalError>>();

    tokio::select! {
        received = ctrl_c => received,
        received = terminate => received,
    }
}

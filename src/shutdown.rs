use actix_web::dev::ServerHandle;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::api::job::SharedSavedJobs;

/// Handles graceful shutdown of the application
///
/// This module orchestrates graceful shutdown by:
/// 1. Listening for shutdown signals (SIGTERM, SIGINT/CTRL+C)
/// 2. Stopping the HTTP server (in-flight requests finish first)
/// 3. Reporting the saved jobs state, which is already on disk
pub struct ShutdownCoordinator {
    server_handle: ServerHandle,
    server_task: JoinHandle<Result<(), std::io::Error>>,
    saved: SharedSavedJobs,
}

impl ShutdownCoordinator {
    /// Create a new shutdown coordinator
    pub fn new(
        server_handle: ServerHandle,
        server_task: JoinHandle<Result<(), std::io::Error>>,
        saved: SharedSavedJobs,
    ) -> Self {
        Self {
            server_handle,
            server_task,
            saved,
        }
    }

    /// Wait for shutdown signal and perform graceful shutdown
    ///
    /// This function will block until either:
    /// - CTRL+C is received
    /// - SIGTERM is received (Unix only)
    pub async fn wait_for_shutdown(self) -> Result<(), std::io::Error> {
        let ctrl_c = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for CTRL+C: {:?}", e);
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut signal) => {
                    signal.recv().await;
                }
                Err(e) => {
                    error!("Failed to install SIGTERM handler: {:?}", e);
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {
                info!("Received CTRL+C signal, initiating graceful shutdown...");
            }
            _ = terminate => {
                info!("Received SIGTERM signal, initiating graceful shutdown...");
            }
        }

        self.shutdown().await
    }

    /// Perform the actual shutdown sequence
    async fn shutdown(self) -> Result<(), std::io::Error> {
        // 1. Stop HTTP server (stop accepting new requests)
        info!("Stopping HTTP server (no longer accepting new requests)...");
        self.server_handle.stop(true).await;

        // 2. Wait for HTTP server task to complete
        match self.server_task.await {
            Ok(Ok(_)) => info!("HTTP server shut down successfully"),
            Ok(Err(e)) => error!("HTTP server encountered error during shutdown: {:?}", e),
            Err(e) => error!("HTTP server task panicked: {:?}", e),
        }

        // 3. Saved jobs are written on every toggle; nothing left to flush
        match self.saved.lock() {
            Ok(saved) => info!("{} saved jobs persisted", saved.len()),
            Err(_) => error!("Saved jobs registry was poisoned during shutdown"),
        }

        info!("Graceful shutdown completed successfully");
        Ok(())
    }
}

//! OS signal handling.
//!
//! # Responsibilities
//! - Ctrl-C / SIGTERM trigger graceful shutdown
//! - SIGHUP rebuilds the registry from disk and installs it
//!
//! # Design Decisions
//! - Reload file I/O runs on the blocking pool, never on a runtime worker
//! - A reload that fails to read either table keeps the current registry

use std::sync::Arc;

use crate::config::loader::try_load_registry;
use crate::config::RegistryConfig;
use crate::engine::EngineHandle;
use crate::lifecycle::shutdown::{Shutdown, ShutdownSignal};

/// Rebuild the registry from its sources and swap it in.
///
/// Returns the new registry generation, or `None` if the current one was kept.
pub fn reload_registry(handle: &EngineHandle, config: &RegistryConfig) -> Option<u64> {
    match try_load_registry(config) {
        Ok(registry) => Some(handle.install(registry)),
        Err(e) => {
            tracing::warn!(
                error = %e,
                generation = handle.load().registry().generation(),
                "Registry reload failed, keeping current registry"
            );
            None
        }
    }
}

/// [`reload_registry`] on the blocking thread pool.
pub async fn reload_in_background(handle: Arc<EngineHandle>, config: RegistryConfig) -> Option<u64> {
    match tokio::task::spawn_blocking(move || reload_registry(&handle, &config)).await {
        Ok(generation) => generation,
        Err(e) => {
            tracing::error!(error = %e, "Registry reload task failed");
            None
        }
    }
}

/// Handle signals until shutdown.
pub async fn handle_signals(
    handle: Arc<EngineHandle>,
    config: RegistryConfig,
    shutdown: Arc<Shutdown>,
) {
    let mut stopped = shutdown.subscribe();

    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let (mut hangup, mut terminate) =
            match (signal(SignalKind::hangup()), signal(SignalKind::terminate())) {
                (Ok(hangup), Ok(terminate)) => (hangup, terminate),
                (Err(e), _) | (_, Err(e)) => {
                    tracing::error!(error = %e, "Failed to install signal handlers, reload via SIGHUP disabled");
                    wait_ctrl_c(&shutdown, &mut stopped).await;
                    return;
                }
            };

        loop {
            tokio::select! {
                _ = stopped.recv() => break,
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Shutdown signal received");
                    shutdown.trigger();
                    break;
                }
                _ = terminate.recv() => {
                    tracing::info!("SIGTERM received");
                    shutdown.trigger();
                    break;
                }
                _ = hangup.recv() => {
                    tracing::info!("SIGHUP received, reloading registry");
                    reload_in_background(Arc::clone(&handle), config.clone()).await;
                }
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = (&handle, &config);
        wait_ctrl_c(&shutdown, &mut stopped).await;
    }
}

async fn wait_ctrl_c(shutdown: &Shutdown, stopped: &mut ShutdownSignal) {
    tokio::select! {
        _ = stopped.recv() => {}
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                tracing::error!(error = %e, "Failed to listen for Ctrl+C");
                return;
            }
            tracing::info!("Shutdown signal received");
            shutdown.trigger();
        }
    }
}

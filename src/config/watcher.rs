//! Registry file watcher for hot reload.
//!
//! Only registries whose tables both load are sent; a failed reload keeps the
//! registry in effect.

use std::path::Path;
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::try_load_registry;
use crate::config::schema::RegistryConfig;
use crate::registry::Registry;

/// A watcher that monitors the registry tables for changes.
pub struct RegistryWatcher {
    config: RegistryConfig,
    update_tx: mpsc::UnboundedSender<Registry>,
}

impl RegistryWatcher {
    /// Create a new RegistryWatcher.
    ///
    /// Returns the watcher and a receiver for freshly built registries.
    pub fn new(config: RegistryConfig) -> (Self, mpsc::UnboundedReceiver<Registry>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (Self { config, update_tx }, update_rx)
    }

    /// Start watching both table files in a background thread.
    ///
    /// The returned watcher must be kept alive for events to be delivered.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.update_tx.clone();
        let config = self.config.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() {
                        tracing::info!(paths = ?event.paths, "Registry file change detected, reloading...");
                        match try_load_registry(&config) {
                            Ok(registry) => {
                                let _ = tx.send(registry);
                            }
                            Err(e) => {
                                tracing::warn!(error = %e, "Registry reload failed, keeping current registry");
                            }
                        }
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        for path in [&self.config.services_path, &self.config.alts_path] {
            if let Err(e) = watcher.watch(Path::new(path), RecursiveMode::NonRecursive) {
                tracing::warn!(path = %path, error = %e, "Cannot watch registry file");
            }
        }

        tracing::info!(
            services = %self.config.services_path,
            alts = %self.config.alts_path,
            "Registry watcher started"
        );
        Ok(watcher)
    }
}

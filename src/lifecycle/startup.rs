//! Startup orchestration.
//!
//! # Responsibilities
//! - Load the registry and build the first engine
//! - Start the metrics exporter and the registry watcher
//!
//! # Design Decisions
//! - A registry that fails to load starts the bot anyway (every link misses)
//! - A watcher that fails to start is logged; SIGHUP reload still works

use std::net::SocketAddr;
use std::sync::Arc;

use notify::RecommendedWatcher;

use crate::config::loader::load_registry;
use crate::config::watcher::RegistryWatcher;
use crate::config::BotConfig;
use crate::engine::{EngineHandle, EngineOptions};
use crate::observability::metrics;

/// Running subsystems. Dropping it stops the registry watcher.
pub struct Runtime {
    pub handle: Arc<EngineHandle>,
    pub config: BotConfig,
    _watcher: Option<RecommendedWatcher>,
}

/// Initialize everything the message loop needs. Must run inside a Tokio runtime.
pub fn start(config: BotConfig) -> Runtime {
    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let registry = load_registry(&config.registry);
    let handle = Arc::new(EngineHandle::new(registry, EngineOptions::from(&config)));

    let watcher = if config.registry.watch {
        start_watcher(&config, Arc::clone(&handle))
    } else {
        None
    };

    tracing::info!(
        bare_domains = config.detection.bare_domains,
        cache_enabled = config.cache.enabled,
        cache_capacity = config.cache.capacity,
        reply_policy = ?config.reply.policy,
        "Engine ready"
    );

    Runtime {
        handle,
        config,
        _watcher: watcher,
    }
}

fn start_watcher(config: &BotConfig, handle: Arc<EngineHandle>) -> Option<RecommendedWatcher> {
    let (watcher, mut updates) = RegistryWatcher::new(config.registry.clone());
    let watcher = match watcher.run() {
        Ok(w) => w,
        Err(e) => {
            tracing::error!(error = %e, "Failed to start registry watcher");
            return None;
        }
    };

    tokio::spawn(async move {
        while let Some(registry) = updates.recv().await {
            handle.install(registry);
        }
    });

    Some(watcher)
}

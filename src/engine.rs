//! The substitution engine and its reloadable handle.
//!
//! # Design Decisions
//! - An `Engine` owns one frozen registry, one scanner policy and one cache
//! - Reload builds a whole new `Engine` and installs it with a single swap;
//!   callers holding the previous `Arc<Engine>` finish against it
//! - `Engine` is `Send + Sync`, so any number of tasks may share it

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::config::BotConfig;
use crate::observability::metrics;
use crate::registry::Registry;
use crate::scanner::LinkScanner;
use crate::substitution::{self, Outcome, SubstitutionCache};

/// Engine settings taken from the bot configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOptions {
    pub bare_domains: bool,
    pub cache_enabled: bool,
    pub cache_capacity: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self::from(&BotConfig::default())
    }
}

impl From<&BotConfig> for EngineOptions {
    fn from(config: &BotConfig) -> Self {
        Self {
            bare_domains: config.detection.bare_domains,
            cache_enabled: config.cache.enabled,
            cache_capacity: config.cache.capacity,
        }
    }
}

/// Link detection and substitution against one registry.
#[derive(Debug)]
pub struct Engine {
    registry: Arc<Registry>,
    scanner: LinkScanner,
    cache: Option<SubstitutionCache>,
}

impl Engine {
    pub fn new(registry: Arc<Registry>, options: &EngineOptions) -> Self {
        let cache = options
            .cache_enabled
            .then(|| SubstitutionCache::new(options.cache_capacity));
        Self {
            registry,
            scanner: LinkScanner::new(options.bare_domains),
            cache,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Candidate links in `text`, in order of appearance.
    pub fn detect_links<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let links = self.scanner.scan(text);
        metrics::record_links_detected(links.len());
        links
    }

    /// Substitute one link, consulting the cache first.
    pub fn substitute(&self, link: &str) -> Arc<Outcome> {
        if let Some(cached) = self.cache.as_ref().and_then(|c| c.get(link)) {
            metrics::record_cache_hit();
            return cached;
        }

        let outcome = Arc::new(substitution::substitute(link, &self.registry));
        metrics::record_substitution(outcome.label());
        tracing::debug!(link = %link, outcome = outcome.label(), "Substituted link");

        if let Some(cache) = &self.cache {
            if !cache.insert(link, Arc::clone(&outcome)) {
                tracing::trace!(capacity = cache.capacity(), "Substitution cache full");
            }
        }
        outcome
    }

    /// Number of cached links (0 when caching is disabled).
    pub fn cached(&self) -> usize {
        self.cache.as_ref().map_or(0, SubstitutionCache::len)
    }
}

/// Shared pointer to the current engine.
pub struct EngineHandle {
    current: ArcSwap<Engine>,
    options: EngineOptions,
}

impl EngineHandle {
    pub fn new(registry: Registry, options: EngineOptions) -> Self {
        metrics::record_registry(registry.services().len());
        let engine = Engine::new(Arc::new(registry), &options);
        Self {
            current: ArcSwap::from_pointee(engine),
            options,
        }
    }

    /// The engine in effect right now.
    pub fn load(&self) -> Arc<Engine> {
        self.current.load_full()
    }

    /// Replace the registry. The new engine starts with an empty cache.
    ///
    /// Returns the generation of the installed registry.
    pub fn install(&self, registry: Registry) -> u64 {
        let generation = registry.generation();
        metrics::record_registry(registry.services().len());
        metrics::record_reload();

        let previous = self
            .current
            .swap(Arc::new(Engine::new(Arc::new(registry), &self.options)));
        tracing::info!(
            generation,
            previous_generation = previous.registry().generation(),
            dropped_cache_entries = previous.cached(),
            "Registry installed"
        );
        generation
    }
}

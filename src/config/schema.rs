//! Configuration schema definitions.
//!
//! `BotConfig` is the TOML bot configuration. `ServiceSource` and
//! `AltSource` are the entry shapes of the JSON registry files.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::registry::{default_aliases, AliasRule};

/// Root configuration for the bot.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct BotConfig {
    /// Registry sources and alias rules.
    pub registry: RegistryConfig,

    /// Link detection policy.
    pub detection: DetectionConfig,

    /// Substitution result cache.
    pub cache: CacheConfig,

    /// Reply presentation.
    pub reply: ReplyConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Where the service and alt tables come from.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Path to the services JSON table.
    pub services_path: String,

    /// Path to the alt frontends JSON table.
    pub alts_path: String,

    /// Reload the registry when either file changes.
    pub watch: bool,

    /// Alias rules applied after every load, in order.
    pub aliases: Vec<AliasRule>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            services_path: "config/services.json".to_string(),
            alts_path: "config/alts.json".to_string(),
            watch: true,
            aliases: default_aliases(),
        }
    }
}

/// Link detection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Detect links without a scheme or `www.` prefix (e.g. `youtube.com/watch`).
    pub bare_domains: bool,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self { bare_domains: true }
    }
}

/// Substitution cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Memoize link → substitution results.
    pub enabled: bool,

    /// Maximum cached links (0 = unbounded).
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            capacity: 1024,
        }
    }
}

/// Which substitutions end up in a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReplyPolicy {
    /// One line per detected link, using the first mirror.
    #[default]
    First,
    /// One line per mirror.
    All,
}

/// Reply presentation configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ReplyConfig {
    pub policy: ReplyPolicy,

    /// Append ` (source: <original link>)` to each line.
    pub include_source: bool,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

/// One entry of the services table, keyed by canonical domain.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
pub struct ServiceSource {
    #[serde(default)]
    pub alt_domains: Option<Vec<String>>,

    #[serde(default)]
    pub query_whitelist: Option<Vec<String>>,
}

/// One entry of the alts table, keyed by alt frontend domain.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
pub struct AltSource {
    /// Canonical domain of the service this frontend substitutes.
    #[serde(default)]
    pub service: Option<String>,
}

//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation of the bot config (serde handles syntactic)
//! - Referential checks on the registry (alts reference existing services)
//! - `host[:port]` syntax checks on alt frontend domains
//!
//! # Design Decisions
//! - Returns all findings, not just the first
//! - Bot config problems are errors and stop startup
//! - Registry problems are warnings: the registry still loads and a broken
//!   entry only ever produces a missed substitution

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::BotConfig;
use crate::registry::{parse_authority, Registry};

/// A bot configuration problem.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("registry.{field} must not be empty")]
    EmptyPath { field: &'static str },

    #[error("alias rule {index} has an empty service or alias")]
    EmptyAlias { index: usize },

    #[error("observability.metrics_address '{0}' is not a socket address")]
    MetricsAddress(String),

    #[error("observability.log_level '{0}' is not a valid filter")]
    LogLevel(String),
}

/// A registry problem that does not prevent loading.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryWarning {
    #[error("no services configured")]
    NoServices,

    #[error("no alt frontends configured")]
    NoAlts,

    #[error("alt frontend '{alt}' substitutes unknown service '{service}'")]
    UnknownService { alt: String, service: String },

    #[error("alt frontend '{0}' is not a valid host[:port]")]
    InvalidAltHost(String),
}

/// Validate the bot configuration.
pub fn validate_config(config: &BotConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.registry.services_path.trim().is_empty() {
        errors.push(ValidationError::EmptyPath { field: "services_path" });
    }
    if config.registry.alts_path.trim().is_empty() {
        errors.push(ValidationError::EmptyPath { field: "alts_path" });
    }

    for (index, rule) in config.registry.aliases.iter().enumerate() {
        if rule.service.trim().is_empty() || rule.alias.trim().is_empty() {
            errors.push(ValidationError::EmptyAlias { index });
        }
    }

    let observability = &config.observability;
    if observability.metrics_enabled
        && observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            observability.metrics_address.clone(),
        ));
    }
    if tracing_subscriber::EnvFilter::try_new(&observability.log_level).is_err() {
        errors.push(ValidationError::LogLevel(observability.log_level.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Check a built registry. An empty result means no findings.
pub fn validate_registry(registry: &Registry) -> Vec<RegistryWarning> {
    let mut warnings = Vec::new();

    if registry.is_empty() {
        warnings.push(RegistryWarning::NoServices);
    }
    if registry.alts().is_empty() {
        warnings.push(RegistryWarning::NoAlts);
    }

    for alt in registry.alts() {
        if parse_authority(&alt.domain).is_none() {
            warnings.push(RegistryWarning::InvalidAltHost(alt.domain.clone()));
        }
        if !registry.is_empty() && registry.service(&alt.service).is_none() {
            warnings.push(RegistryWarning::UnknownService {
                alt: alt.domain.clone(),
                service: alt.service.clone(),
            });
        }
    }

    warnings
}

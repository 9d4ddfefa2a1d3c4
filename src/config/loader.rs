//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::schema::{AltSource, BotConfig, RegistryConfig, ServiceSource};
use crate::config::validation::{validate_config, validate_registry, ValidationError};
use crate::registry::Registry;

/// Overrides `registry.services_path`.
pub const SERVICES_PATH_ENV: &str = "LINK_MIRROR_SERVICES_PATH";
/// Overrides `registry.alts_path`.
pub const ALTS_PATH_ENV: &str = "LINK_MIRROR_ALTS_PATH";

/// Error type for bot configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Error type for a single registry table.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON syntax error in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid entry '{key}' in {path}: {source}")]
    Entry {
        path: String,
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Load and validate the bot configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<BotConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let mut config: BotConfig = toml::from_str(&content)?;
    apply_env_overrides(&mut config.registry);

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Load the configuration at `path`, or the defaults when no path is given.
pub fn load_config_or_default(path: Option<&Path>) -> Result<BotConfig, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => {
            let mut config = BotConfig::default();
            apply_env_overrides(&mut config.registry);
            validate_config(&config).map_err(ConfigError::Validation)?;
            Ok(config)
        }
    }
}

fn apply_env_overrides(registry: &mut RegistryConfig) {
    if let Ok(path) = std::env::var(SERVICES_PATH_ENV) {
        registry.services_path = path;
    }
    if let Ok(path) = std::env::var(ALTS_PATH_ENV) {
        registry.alts_path = path;
    }
}

/// Read a JSON object table, keeping the declaration order of its keys.
pub fn load_table<T: DeserializeOwned>(path: &Path) -> Result<Vec<(String, T)>, RegistryError> {
    let display = path.display().to_string();
    let content = fs::read_to_string(path).map_err(|source| RegistryError::Io {
        path: display.clone(),
        source,
    })?;
    parse_table(&content, &display)
}

/// Parse a JSON object table from a string. `origin` is used in errors.
pub fn parse_table<T: DeserializeOwned>(
    content: &str,
    origin: &str,
) -> Result<Vec<(String, T)>, RegistryError> {
    let map: serde_json::Map<String, serde_json::Value> =
        serde_json::from_str(content).map_err(|source| RegistryError::Json {
            path: origin.to_string(),
            source,
        })?;

    map.into_iter()
        .map(|(key, value)| {
            let entry = serde_json::from_value(value).map_err(|source| RegistryError::Entry {
                path: origin.to_string(),
                key: key.clone(),
                source,
            })?;
            Ok((key, entry))
        })
        .collect()
}

/// Load both registry tables, seed aliases, and log validation findings.
///
/// A table that cannot be read degrades to empty with a warning; this never
/// fails. Used at startup, where there is no previous registry to keep.
pub fn load_registry(config: &RegistryConfig) -> Registry {
    let services: Vec<(String, ServiceSource)> =
        load_table(Path::new(&config.services_path)).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Services table unavailable, link substitution will not work");
            Vec::new()
        });
    let alts: Vec<(String, AltSource)> =
        load_table(Path::new(&config.alts_path)).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Alts table unavailable, link substitution will not work");
            Vec::new()
        });

    assemble(services, alts, config)
}

/// Like [`load_registry`], but fails if either table cannot be read or parsed.
///
/// Reloads use this so a half-written file keeps the registry in effect.
pub fn try_load_registry(config: &RegistryConfig) -> Result<Registry, RegistryError> {
    let services: Vec<(String, ServiceSource)> = load_table(Path::new(&config.services_path))?;
    let alts: Vec<(String, AltSource)> = load_table(Path::new(&config.alts_path))?;
    Ok(assemble(services, alts, config))
}

fn assemble(
    services: Vec<(String, ServiceSource)>,
    alts: Vec<(String, AltSource)>,
    config: &RegistryConfig,
) -> Registry {
    let mut registry = Registry::build(services, alts);
    let seeded = registry.seed_aliases(&config.aliases);

    for warning in validate_registry(&registry) {
        tracing::warn!(%warning, "Registry check");
    }

    tracing::info!(
        generation = registry.generation(),
        services = registry.services().len(),
        alts = registry.alts().len(),
        aliases_seeded = seeded,
        "Registry loaded"
    );
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_table_preserves_order() {
        let table: Vec<(String, AltSource)> = parse_table(
            r#"{"z.example": {"service": "a.com"}, "a.example": {"service": "a.com"}, "m.example": {}}"#,
            "alts.json",
        )
        .unwrap();
        let keys: Vec<_> = table.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["z.example", "a.example", "m.example"]);
        assert!(table[2].1.service.is_none());
    }

    #[test]
    fn test_parse_table_syntax_error() {
        let err = parse_table::<AltSource>("{not json", "alts.json").unwrap_err();
        assert!(matches!(err, RegistryError::Json { .. }));
        assert!(err.to_string().contains("alts.json"));
    }

    #[test]
    fn test_parse_table_bad_entry() {
        let err = parse_table::<ServiceSource>(r#"{"a.com": {"alt_domains": 5}}"#, "services.json")
            .unwrap_err();
        match err {
            RegistryError::Entry { key, .. } => assert_eq!(key, "a.com"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_registry_missing_files_degrades() {
        let config = RegistryConfig {
            services_path: "/nonexistent/services.json".into(),
            alts_path: "/nonexistent/alts.json".into(),
            ..RegistryConfig::default()
        };
        let registry = load_registry(&config);
        assert!(registry.is_empty());
        assert!(registry.alts().is_empty());
    }

    #[test]
    fn test_load_registry_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let services_path = dir.path().join("services.json");
        let alts_path = dir.path().join("alts.json");
        fs::File::create(&services_path)
            .unwrap()
            .write_all(br#"{"twitter.com": {"query_whitelist": []}}"#)
            .unwrap();
        fs::File::create(&alts_path)
            .unwrap()
            .write_all(br#"{"nitter.example": {"service": "twitter.com"}}"#)
            .unwrap();

        let config = RegistryConfig {
            services_path: services_path.display().to_string(),
            alts_path: alts_path.display().to_string(),
            ..RegistryConfig::default()
        };
        let registry = load_registry(&config);
        assert!(registry.service("twitter.com").unwrap().recognizes("x.com"));
        assert_eq!(registry.alts().len(), 1);
    }

    #[test]
    fn test_try_load_registry_rejects_broken_table() {
        let dir = tempfile::tempdir().unwrap();
        let services_path = dir.path().join("services.json");
        let alts_path = dir.path().join("alts.json");
        fs::write(&services_path, br#"{"twitter.com": {"query_whit"#).unwrap();
        fs::write(&alts_path, br#"{"nitter.example": {"service": "twitter.com"}}"#).unwrap();

        let mut config = RegistryConfig {
            services_path: services_path.display().to_string(),
            alts_path: alts_path.display().to_string(),
            ..RegistryConfig::default()
        };
        let err = try_load_registry(&config).unwrap_err();
        assert!(matches!(err, RegistryError::Json { .. }));

        config.alts_path = dir.path().join("missing.json").display().to_string();
        fs::write(&services_path, br#"{"twitter.com": {}}"#).unwrap();
        assert!(matches!(try_load_registry(&config), Err(RegistryError::Io { .. })));
    }

    #[test]
    fn test_load_config_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[cache\ncapacity = ").unwrap();
        let err = load_config(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}

//! Link substitution subsystem.
//!
//! # Data Flow
//! ```text
//! candidate link
//!     → matcher.rs (normalize to https, recognize service)
//!     → query.rs (drop non-whitelisted query parameters)
//!     → generator.rs (one URL per alt frontend)
//!     → Outcome: NoMatch | NoSubstitution | Success(links)
//! ```
//!
//! # Design Decisions
//! - Every step only reads the registry; results are owned values
//! - Total: every input string maps to exactly one Outcome
//! - Results for a fixed registry are pure, which makes cache.rs sound

pub mod cache;
pub mod generator;
pub mod matcher;
pub mod query;

pub use cache::SubstitutionCache;
pub use generator::generate;
pub use matcher::{match_service, normalize, ServiceMatch};
pub use query::sanitize_query;

use crate::registry::Registry;

/// Result of substituting one link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Not a link to a configured service (includes malformed URLs).
    NoMatch,
    /// The service is known but has no alt frontend to substitute with.
    NoSubstitution { service: String },
    /// Replacement links in configuration order, never empty.
    Success(Vec<String>),
}

impl Outcome {
    /// Replacement links; empty unless `Success`.
    pub fn links(&self) -> &[String] {
        match self {
            Outcome::Success(links) => links,
            _ => &[],
        }
    }

    /// The first replacement link, if any.
    pub fn first(&self) -> Option<&str> {
        self.links().first().map(String::as_str)
    }

    /// Metric label for this outcome.
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::NoMatch => "no_match",
            Outcome::NoSubstitution { .. } => "no_substitution",
            Outcome::Success(_) => "success",
        }
    }
}

/// Substitute `link` against `registry` without caching.
pub fn substitute(link: &str, registry: &Registry) -> Outcome {
    let Some(ServiceMatch { service, mut url }) = match_service(link, registry) else {
        return Outcome::NoMatch;
    };

    query::apply_sanitized_query(&mut url, service);

    let links = generate(&url, &service.domain, registry);
    if links.is_empty() {
        Outcome::NoSubstitution {
            service: service.domain.clone(),
        }
    } else {
        Outcome::Success(links)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{AltSource, ServiceSource};
    use crate::registry::default_aliases;

    fn registry() -> Registry {
        let mut registry = Registry::build(
            vec![
                ("example.com".into(), ServiceSource {
                    alt_domains: None,
                    query_whitelist: Some(vec!["x".into()]),
                }),
                ("twitter.com".into(), ServiceSource::default()),
                ("vimeo.com".into(), ServiceSource::default()),
            ],
            vec![
                ("mirror.example".into(), AltSource { service: Some("example.com".into()) }),
                ("nitter.example".into(), AltSource { service: Some("twitter.com".into()) }),
            ],
        );
        registry.seed_aliases(&default_aliases());
        registry
    }

    #[test]
    fn test_substitute_filters_query() {
        let outcome = substitute("https://example.com/p?x=1&y=2", &registry());
        assert_eq!(outcome, Outcome::Success(vec!["https://mirror.example/p?x=1".into()]));
    }

    #[test]
    fn test_substitute_case_insensitive_host() {
        let registry = registry();
        assert_eq!(
            substitute("HTTPS://Example.COM/a", &registry),
            substitute("https://example.com/a", &registry)
        );
    }

    #[test]
    fn test_empty_whitelist_drops_query() {
        let outcome = substitute("twitter.com/u/status/1?s=20&t=abc", &registry());
        assert_eq!(outcome.first(), Some("https://nitter.example/u/status/1"));
    }

    #[test]
    fn test_seeded_alias_recognized() {
        let registry = registry();
        assert_eq!(
            substitute("https://x.com/user/status/1", &registry),
            substitute("https://twitter.com/user/status/1", &registry)
        );
    }

    #[test]
    fn test_no_substitution() {
        assert_eq!(
            substitute("https://vimeo.com/1", &registry()),
            Outcome::NoSubstitution { service: "vimeo.com".into() }
        );
    }

    #[test]
    fn test_no_match() {
        let outcome = substitute("notes.txt", &registry());
        assert_eq!(outcome, Outcome::NoMatch);
        assert!(outcome.links().is_empty());
        assert_eq!(outcome.label(), "no_match");
    }

    #[test]
    fn test_unicode_service_host() {
        let registry = Registry::build(
            vec![("bücher.example".into(), ServiceSource::default())],
            vec![("mirror.example".into(), AltSource { service: Some("Bücher.example".into()) })],
        );
        let expected = Outcome::Success(vec!["https://mirror.example/a".into()]);
        assert_eq!(substitute("https://bücher.example/a", &registry), expected);
        assert_eq!(substitute("https://xn--bcher-kva.example/a", &registry), expected);
    }

    #[test]
    fn test_path_is_normalized() {
        let registry = registry();
        assert_eq!(substitute("example.com/a/../b", &registry).first(), Some("https://mirror.example/b"));
        assert_eq!(substitute("example.com", &registry).first(), Some("https://mirror.example/"));
        assert_eq!(substitute("example.com/a/./b", &registry).first(), Some("https://mirror.example/a/b"));
    }

    #[test]
    fn test_plain_http_upgraded() {
        let outcome = substitute("http://example.com/a", &registry());
        assert_eq!(outcome.first(), Some("https://mirror.example/a"));
    }
}

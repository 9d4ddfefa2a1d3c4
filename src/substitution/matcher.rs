//! URL normalization and service recognition.
//!
//! # Responsibilities
//! - Turn a scanner candidate into an absolute `https` URL
//! - Recognize the service by canonical domain, then by alt domain
//!
//! # Design Decisions
//! - Host lookup is case-insensitive; path, query and fragment keep their casing
//! - Plain HTTP is always upgraded
//! - The path is WHATWG-normalized by `url`: dot-segments are resolved and an
//!   empty path becomes `/`
//! - Alt-domain fallback scans services in declaration order, first hit wins
//! - Unparseable candidates are a miss, never an error

use url::Url;

use crate::registry::{Registry, ServiceEntry};

/// A recognized link.
#[derive(Debug, Clone)]
pub struct ServiceMatch<'r> {
    /// The service the link belongs to.
    pub service: &'r ServiceEntry,
    /// The normalized link (`https`, original host).
    pub url: Url,
}

fn has_prefix_ignore_case(s: &str, prefix: &str) -> bool {
    s.get(..prefix.len())
        .map(|head| head.eq_ignore_ascii_case(prefix))
        .unwrap_or(false)
}

/// Parse `candidate` as an `https` URL, adding the scheme if missing.
pub fn normalize(candidate: &str) -> Option<Url> {
    let candidate = candidate.trim();
    let mut url = if has_prefix_ignore_case(candidate, "https://")
        || has_prefix_ignore_case(candidate, "http://")
    {
        Url::parse(candidate).ok()?
    } else {
        Url::parse(&format!("https://{candidate}")).ok()?
    };

    url.set_scheme("https").ok()?;
    url.host_str()?;
    Some(url)
}

/// Find the service `host` belongs to. `host` must already be normalized.
pub fn find_service<'r>(host: &str, registry: &'r Registry) -> Option<&'r ServiceEntry> {
    registry
        .service(host)
        .or_else(|| registry.services().iter().find(|entry| entry.recognizes(host)))
}

/// Normalize `candidate` and recognize its service.
pub fn match_service<'r>(candidate: &str, registry: &'r Registry) -> Option<ServiceMatch<'r>> {
    let url = normalize(candidate)?;
    let host = url.host_str()?.to_ascii_lowercase();
    let service = find_service(&host, registry)?;
    Some(ServiceMatch { service, url })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::ServiceSource;

    fn registry() -> Registry {
        Registry::build(
            vec![
                ("youtube.com".into(), ServiceSource {
                    alt_domains: Some(vec!["m.youtube.com".into(), "youtu.be".into()]),
                    query_whitelist: None,
                }),
                ("music.example".into(), ServiceSource {
                    alt_domains: Some(vec!["youtu.be".into()]),
                    query_whitelist: None,
                }),
            ],
            vec![],
        )
    }

    #[test]
    fn test_normalize_adds_scheme() {
        let url = normalize("youtube.com/watch?v=abc").unwrap();
        assert_eq!(url.as_str(), "https://youtube.com/watch?v=abc");
    }

    #[test]
    fn test_normalize_upgrades_http() {
        let url = normalize("http://youtube.com/a").unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.as_str(), "https://youtube.com/a");
    }

    #[test]
    fn test_normalize_uppercase_scheme() {
        let url = normalize("HTTPS://Example.COM/Path?Q=V#Frag").unwrap();
        assert_eq!(url.host_str(), Some("example.com"));
        assert_eq!(url.path(), "/Path");
        assert_eq!(url.query(), Some("Q=V"));
        assert_eq!(url.fragment(), Some("Frag"));
    }

    #[test]
    fn test_normalize_rejects_garbage() {
        assert!(normalize("https://").is_none());
        assert!(normalize("").is_none());
        assert!(normalize("http://exa mple.com").is_none());
    }

    #[test]
    fn test_match_canonical() {
        let registry = registry();
        let m = match_service("https://YouTube.com/watch", &registry).unwrap();
        assert_eq!(m.service.domain, "youtube.com");
    }

    #[test]
    fn test_match_alt_domain_first_declared_wins() {
        let registry = registry();
        let m = match_service("youtu.be/abc", &registry).unwrap();
        assert_eq!(m.service.domain, "youtube.com");
        assert_eq!(m.url.host_str(), Some("youtu.be"));
    }

    #[test]
    fn test_no_match() {
        let registry = registry();
        assert!(match_service("notes.txt", &registry).is_none());
        assert!(match_service("https://vimeo.com/1", &registry).is_none());
        assert!(match_service("https://youtube.com/a", &Registry::empty()).is_none());
    }

    #[test]
    fn test_www_prefix_is_distinct_host() {
        let registry = registry();
        assert!(match_service("www.youtube.com/a", &registry).is_none());
    }
}

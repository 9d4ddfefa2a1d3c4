//! Service and alt-frontend lookup tables.
//!
//! # Data Flow
//! ```text
//! services.json / alts.json
//!     → config::loader (ordered source tables)
//!     → Registry::build (normalize hosts, drop unusable entries)
//!     → Registry::seed_aliases (alias rules from bot config)
//!     → Arc<Registry> (frozen, shared read-only with the engine)
//! ```
//!
//! # Design Decisions
//! - Both tables keep configuration declaration order; it decides ties
//! - Hosts are stored the way `url` parses them (lowercase punycode),
//!   everything else is kept verbatim
//! - A reload builds a new Registry, nothing is mutated after freezing

pub mod alias;

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use url::{Host, Url};

use crate::config::schema::{AltSource, ServiceSource};

pub use alias::{default_aliases, AliasRule};

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// Normalize a host the way `url` stores it: lowercase, IDNA to punycode.
///
/// Strings that are not valid hosts are only lowercased, so they never match.
pub fn normalize_host(host: &str) -> String {
    let host = host.trim();
    match Host::parse(host) {
        Ok(parsed) => parsed.to_string(),
        Err(_) => host.to_lowercase(),
    }
}

/// Split a `host[:port]` authority into a normalized host and explicit port.
///
/// `None` if the string carries anything besides host and port.
pub fn parse_authority(authority: &str) -> Option<(String, Option<u16>)> {
    let authority = authority.trim();
    if authority.is_empty() {
        return None;
    }
    let url = Url::parse(&format!("https://{authority}")).ok()?;
    if url.path() != "/"
        || url.query().is_some()
        || url.fragment().is_some()
        || !url.username().is_empty()
        || url.password().is_some()
    {
        return None;
    }
    Some((url.host_str()?.to_string(), url.port()))
}

/// A canonical content platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEntry {
    /// Canonical domain, lowercase punycode.
    pub domain: String,
    /// Hosts recognized as this service when matching inbound links.
    pub alt_domains: Vec<String>,
    /// Query parameter names that survive substitution (exact, case-sensitive).
    pub query_whitelist: Vec<String>,
}

impl ServiceEntry {
    /// Returns true if `host` (already normalized) is one of this service's alt domains.
    pub fn recognizes(&self, host: &str) -> bool {
        self.alt_domains.iter().any(|d| d == host)
    }

    /// Returns true if the query parameter `key` may be kept.
    pub fn allows_param(&self, key: &str) -> bool {
        self.query_whitelist.iter().any(|k| k == key)
    }

    /// Add `alias` (normalized) to the alt domains unless already present.
    ///
    /// Returns true if the alias was added.
    pub fn add_alt_domain(&mut self, alias: &str) -> bool {
        let alias = normalize_host(alias);
        if alias == self.domain || self.recognizes(&alias) {
            return false;
        }
        self.alt_domains.push(alias);
        true
    }
}

/// An alternate frontend used as a substitution target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AltFrontend {
    /// `host[:port]` that replaces the service authority in generated links.
    pub domain: String,
    /// Canonical domain of the service this frontend mirrors, normalized.
    pub service: String,
}

/// The frozen pair of lookup tables consumed by the engine.
#[derive(Debug, Clone)]
pub struct Registry {
    services: Vec<ServiceEntry>,
    index: HashMap<String, usize>,
    alts: Vec<AltFrontend>,
    generation: u64,
}

impl Registry {
    /// A registry with no services. Every lookup against it is a miss.
    pub fn empty() -> Self {
        Self::build(Vec::new(), Vec::new())
    }

    /// Build a registry from ordered source tables.
    ///
    /// Duplicate canonical domains keep their first declaration and alt
    /// entries without a `service` are skipped. Both are logged.
    pub fn build(services: Vec<(String, ServiceSource)>, alts: Vec<(String, AltSource)>) -> Self {
        let mut entries: Vec<ServiceEntry> = Vec::with_capacity(services.len());
        let mut index = HashMap::with_capacity(services.len());

        for (domain, source) in services {
            let domain = normalize_host(&domain);
            if index.contains_key(&domain) {
                tracing::warn!(service = %domain, "Duplicate service entry ignored");
                continue;
            }

            let mut entry = ServiceEntry {
                domain: domain.clone(),
                alt_domains: Vec::new(),
                query_whitelist: source.query_whitelist.unwrap_or_default(),
            };
            for alt in source.alt_domains.unwrap_or_default() {
                entry.add_alt_domain(&alt);
            }

            index.insert(domain, entries.len());
            entries.push(entry);
        }

        let alts = alts
            .into_iter()
            .filter_map(|(domain, source)| match source.service {
                Some(service) => Some(AltFrontend {
                    domain: domain.trim().to_string(),
                    service: normalize_host(&service),
                }),
                None => {
                    tracing::warn!(alt = %domain, "Alt frontend has no 'service' value, ignoring");
                    None
                }
            })
            .collect();

        Self {
            services: entries,
            index,
            alts,
            generation: NEXT_GENERATION.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// Apply alias rules in order. Rules naming an unknown service are skipped.
    ///
    /// Returns the number of aliases actually added.
    pub fn seed_aliases(&mut self, rules: &[AliasRule]) -> usize {
        let mut added = 0;
        for rule in rules {
            let key = normalize_host(&rule.service);
            let Some(&idx) = self.index.get(&key) else {
                tracing::debug!(service = %rule.service, alias = %rule.alias, "Alias rule names unknown service");
                continue;
            };
            if self.services[idx].add_alt_domain(&rule.alias) {
                added += 1;
            }
        }
        added
    }

    /// Look up a service by its canonical domain (normalized).
    pub fn service(&self, domain: &str) -> Option<&ServiceEntry> {
        self.index.get(domain).map(|&idx| &self.services[idx])
    }

    /// Services in declaration order.
    pub fn services(&self) -> &[ServiceEntry] {
        &self.services
    }

    /// Alt frontends in declaration order.
    pub fn alts(&self) -> &[AltFrontend] {
        &self.alts
    }

    /// Alt frontends substituting for `service`, in declaration order.
    pub fn alts_for<'a>(&'a self, service: &'a str) -> impl Iterator<Item = &'a AltFrontend> + 'a {
        self.alts
            .iter()
            .filter(move |alt| alt.service.eq_ignore_ascii_case(service))
    }

    /// Identifier of this build, increasing across reloads.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns true if no service is configured.
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::empty()
    }
}

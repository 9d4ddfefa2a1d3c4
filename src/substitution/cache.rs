//! Memoized substitution results.
//!
//! A cache belongs to exactly one `Engine`, and therefore to one registry
//! generation. Reloading builds a new engine with an empty cache, so stale
//! whitelists or alt sets can't leak across reloads.

use std::sync::Arc;

use dashmap::DashMap;

use crate::substitution::Outcome;

/// Thread-safe link → outcome cache with an optional entry bound.
#[derive(Debug, Default)]
pub struct SubstitutionCache {
    entries: DashMap<String, Arc<Outcome>>,
    /// Maximum entries (0 = unbounded).
    capacity: usize,
}

impl SubstitutionCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: DashMap::new(),
            capacity,
        }
    }

    /// Cached outcome for the raw link string.
    pub fn get(&self, link: &str) -> Option<Arc<Outcome>> {
        self.entries.get(link).map(|r| Arc::clone(r.value()))
    }

    /// Store an outcome. Once the bound is reached new links are not cached.
    ///
    /// Returns true if the outcome was stored.
    pub fn insert(&self, link: &str, outcome: Arc<Outcome>) -> bool {
        if self.capacity > 0 && self.entries.len() >= self.capacity && !self.entries.contains_key(link) {
            return false;
        }
        self.entries.insert(link.to_string(), outcome);
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

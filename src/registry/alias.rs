//! Alias seeding rules.
//!
//! Rules are plain data read from the bot configuration and applied once
//! to every freshly built registry, so a new alias never needs a code change.

use serde::{Deserialize, Serialize};

/// Make `alias` recognized as the service whose canonical domain is `service`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AliasRule {
    pub service: String,
    pub alias: String,
}

impl AliasRule {
    pub fn new(service: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            alias: alias.into(),
        }
    }
}

/// Rules applied when the configuration does not list any.
pub fn default_aliases() -> Vec<AliasRule> {
    vec![AliasRule::new("twitter.com", "x.com")]
}

//! Replacement link generation.
//!
//! # Responsibilities
//! - Collect the alt frontends of a service in declaration order
//! - Rewrite the authority of the sanitized URL to each alt `host[:port]`
//!
//! # Design Decisions
//! - Scheme, path, query and fragment are copied unchanged
//! - The source port and userinfo are dropped along with the old host; an
//!   explicit alt port is kept
//! - An alt frontend equal to the link's own authority is skipped, so a
//!   mirror link is never rewritten to itself

use url::Url;

use crate::registry::{parse_authority, Registry};

/// One replacement URL per applicable alt frontend of `service`.
pub fn generate(url: &Url, service: &str, registry: &Registry) -> Vec<String> {
    let own_host = url.host_str().unwrap_or_default();
    let own_port = url.port();

    registry
        .alts_for(service)
        .filter_map(|alt| {
            let Some((host, port)) = parse_authority(&alt.domain) else {
                tracing::debug!(alt = %alt.domain, "Skipping alt frontend with invalid host");
                return None;
            };
            if host == own_host && port == own_port {
                return None;
            }

            let mut mirrored = url.clone();
            // These only fail for cannot-be-a-base URLs, which normalize never yields.
            let _ = mirrored.set_username("");
            let _ = mirrored.set_password(None);
            if let Err(e) = mirrored.set_host(Some(&host)) {
                tracing::debug!(alt = %alt.domain, error = %e, "Skipping alt frontend with invalid host");
                return None;
            }
            let _ = mirrored.set_port(port);
            Some(mirrored.to_string())
        })
        .collect()
}

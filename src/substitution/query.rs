//! Query string filtering.
//!
//! Deny by default: a parameter survives only if its name is in the
//! service's whitelist. Relative order and repeated keys are preserved.

use url::form_urlencoded;
use url::Url;

use crate::registry::ServiceEntry;

/// The whitelisted part of `url`'s query, re-encoded. `None` if nothing survives.
pub fn sanitize_query(url: &Url, service: &ServiceEntry) -> Option<String> {
    if service.query_whitelist.is_empty() {
        return None;
    }

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    let mut kept = 0usize;
    for (key, value) in url.query_pairs() {
        if service.allows_param(&key) {
            serializer.append_pair(&key, &value);
            kept += 1;
        }
    }

    (kept > 0).then(|| serializer.finish())
}

/// Replace `url`'s query with its sanitized form.
pub fn apply_sanitized_query(url: &mut Url, service: &ServiceEntry) {
    let query = sanitize_query(url, service);
    url.set_query(query.as_deref());
}

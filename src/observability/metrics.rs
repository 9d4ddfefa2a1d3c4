//! Metrics collection and exposition.
//!
//! # Metrics
//! - `link_mirror_links_detected_total` (counter): candidates found in messages
//! - `link_mirror_substitutions_total` (counter): computed outcomes by `outcome`
//! - `link_mirror_cache_hits_total` (counter): outcomes served from cache
//! - `link_mirror_registry_services` (gauge): services in the current registry
//! - `link_mirror_registry_reloads_total` (counter): registry swaps

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus exporter. Must run inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_links_detected(count: usize) {
    if count > 0 {
        ::metrics::counter!("link_mirror_links_detected_total").increment(count as u64);
    }
}

pub fn record_substitution(outcome: &'static str) {
    ::metrics::counter!("link_mirror_substitutions_total", "outcome" => outcome).increment(1);
}

pub fn record_cache_hit() {
    ::metrics::counter!("link_mirror_cache_hits_total").increment(1);
}

pub fn record_registry(services: usize) {
    ::metrics::gauge!("link_mirror_registry_services").set(services as f64);
}

pub fn record_reload() {
    ::metrics::counter!("link_mirror_registry_reloads_total").increment(1);
}

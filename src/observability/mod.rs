//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, gauges)
//!
//! Consumers:
//!     → stdout/stderr (pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Structured fields instead of formatted strings
//! - Message bodies are escaped onto one line before logging
//! - Metric updates are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;

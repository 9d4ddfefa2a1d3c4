//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber
//! - Escape free text so one log event stays on one line
//!
//! # Design Decisions
//! - `RUST_LOG` wins over the configured level
//! - JSON format for production, pretty format for development

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::schema::{LogFormat, ObservabilityConfig};

/// Install the global subscriber. Later calls are ignored.
pub fn init(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);
    // Logs go to stderr; stdout carries replies.
    let result = match config.log_format {
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
    };

    if result.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}

/// Render newlines, tabs and backslashes as escape sequences.
pub fn oneline(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oneline() {
        assert_eq!(oneline("a\nb\tc"), "a\\nb\\tc");
        assert_eq!(oneline(r"C:\x"), r"C:\\x");
        assert_eq!(oneline("plain"), "plain");
    }

    #[test]
    fn test_oneline_escapes_backslash_first() {
        // A literal backslash-n must not read back as a newline escape.
        assert_eq!(oneline("\\n\n"), "\\\\n\\n");
    }
}

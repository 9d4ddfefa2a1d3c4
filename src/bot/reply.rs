//! Reply composition.

use crate::config::{ReplyConfig, ReplyPolicy};
use crate::engine::Engine;

/// Build the reply for a message body, or `None` if nothing was substituted.
///
/// One line per substituted link (or per mirror under [`ReplyPolicy::All`]),
/// joined with newlines.
pub fn compose_reply(engine: &Engine, body: &str, config: &ReplyConfig) -> Option<String> {
    let per_link = match config.policy {
        ReplyPolicy::First => 1,
        ReplyPolicy::All => usize::MAX,
    };

    let mut lines = Vec::new();
    for link in engine.detect_links(body) {
        let outcome = engine.substitute(link);
        for mirror in outcome.links().iter().take(per_link) {
            if config.include_source {
                lines.push(format!("{mirror} (source: {link})"));
            } else {
                lines.push(mirror.clone());
            }
        }
    }

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

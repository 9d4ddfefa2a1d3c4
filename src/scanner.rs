//! Link detection in free text.
//!
//! # Grammar
//! ```text
//! candidate := prefix? host port? tail?
//! prefix    := "http://" | "https://" | "ftp://" | "www."
//! host      := (label ".")+ tld
//! label     := [a-z0-9] [a-z0-9-]*
//! tld       := [a-z]{2,}
//! port      := ":" [0-9]+
//! tail      := ("/" | "?" | "#") (not whitespace, quote or angle bracket)*
//! ```
//! Matching is case-insensitive. Without bare-domain detection the prefix
//! is mandatory.
//!
//! # Design Decisions
//! - Recall over precision: `notes.txt` is a candidate, the matcher drops it
//! - Results keep order of appearance, duplicates included
//! - Candidates borrow from the input text

use std::sync::OnceLock;

use regex::Regex;

const PREFIX: &str = r"(?:(?:https?|ftp)://|www\.)";
const BODY: &str = r#"(?:[a-z0-9][a-z0-9-]*\.)+[a-z]{2,}(?::[0-9]+)?(?:[/?#][^\s"'<>]*)?"#;

static PREFIXED: OnceLock<Regex> = OnceLock::new();
static BARE: OnceLock<Regex> = OnceLock::new();

fn prefixed_regex() -> &'static Regex {
    PREFIXED.get_or_init(|| {
        Regex::new(&format!("(?i){PREFIX}{BODY}")).expect("prefixed link pattern is valid")
    })
}

fn bare_regex() -> &'static Regex {
    BARE.get_or_init(|| {
        Regex::new(&format!("(?i){PREFIX}?{BODY}")).expect("bare link pattern is valid")
    })
}

/// Extracts candidate links from message text.
#[derive(Debug, Clone, Copy)]
pub struct LinkScanner {
    pattern: &'static Regex,
}

impl LinkScanner {
    /// Create a scanner. `bare_domains` enables schemeless candidates such as `youtube.com/watch`.
    pub fn new(bare_domains: bool) -> Self {
        let pattern = if bare_domains {
            bare_regex()
        } else {
            prefixed_regex()
        };
        Self { pattern }
    }

    /// All candidates in `text`, in order of appearance.
    pub fn scan<'a>(&self, text: &'a str) -> Vec<&'a str> {
        self.pattern.find_iter(text).map(|m| m.as_str()).collect()
    }

    pub fn bare_domains(&self) -> bool {
        std::ptr::eq(self.pattern, bare_regex())
    }
}

impl Default for LinkScanner {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Scan with the default policy (bare domains enabled).
pub fn detect_links(text: &str) -> Vec<&str> {
    LinkScanner::default().scan(text)
}

//! Mirror-frontend link substitution for chat bots.
//!
//! Scans messages for links to known content platforms and rewrites them to
//! configured alternate frontends, keeping the path and a whitelisted query.

pub mod bot;
pub mod config;
pub mod engine;
pub mod lifecycle;
pub mod observability;
pub mod registry;
pub mod scanner;
pub mod substitution;

pub use config::schema::BotConfig;
pub use engine::{Engine, EngineHandle, EngineOptions};
pub use lifecycle::Shutdown;
pub use registry::Registry;
pub use scanner::detect_links;
pub use substitution::{substitute, Outcome};
